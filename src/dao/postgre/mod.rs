pub use self::{
    path::get_path,
    types::{DBRow, DataBase, PoolOption, PoolType, QueryResult},
};
mod activity;
mod daos;
mod delegation;
mod membership;
mod path;
mod proposal;
mod task;
mod transaction;
mod types;
mod users;
mod vault;
mod vote;
