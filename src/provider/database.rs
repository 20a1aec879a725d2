use crate::{
    configuration::Config,
    dao::{PoolOption, PoolType},
    error::Error,
    model::{
        ActivityEvent, BountyTask, Dao, Membership, Proposal, Table,
        TransactionRecord, User, Vault, Vote, VoteDelegation,
    },
};

#[derive(Debug)]
pub struct DatabasePool {
    pub activity: Table<ActivityEvent>,
    pub daos: Table<Dao>,
    pub membership: Table<Membership>,
    pub proposal: Table<Proposal>,
    pub vote: Table<Vote>,
    pub delegation: Table<VoteDelegation>,
    pub vault: Table<Vault>,
    pub transaction: Table<TransactionRecord>,
    pub users: Table<User>,
    pub task: Table<BountyTask>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let pool = PoolOption::new()
            .max_connections(20)
            .connect(config.database_url.as_str())
            .await?;

        Ok(DatabasePool {
            pool: pool.clone(),
            activity: Table::new(pool.clone()),
            daos: Table::new(pool.clone()),
            membership: Table::new(pool.clone()),
            proposal: Table::new(pool.clone()),
            vote: Table::new(pool.clone()),
            delegation: Table::new(pool.clone()),
            vault: Table::new(pool.clone()),
            transaction: Table::new(pool.clone()),
            users: Table::new(pool.clone()),
            task: Table::new(pool),
        })
    }

    pub fn get_pool(&self) -> &PoolType {
        &self.pool
    }
}
