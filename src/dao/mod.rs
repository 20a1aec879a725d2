mod postgre;

pub use postgre::*;
