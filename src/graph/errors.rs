use thiserror::Error;

use crate::types::AccountId;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Account [{account_id}] is not a node of the graph")]
    NodeNotFound {
        account_id: AccountId
    }
}

impl GraphError {
    pub fn node_not_found(account_id: &str) -> Self {
        Self::NodeNotFound { account_id: account_id.to_string() }
    }
}
