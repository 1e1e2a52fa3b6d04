/// Errors raised while assembling a road graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("connection between {from} and {to} is declared from both ends")]
    DuplicateConnection { from: String, to: String },

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("node index {0} is not in this graph")]
    MissingNode(usize),

    #[error("node name used twice: {0}")]
    DuplicateNode(String),

    #[error("node {0} connects to itself")]
    SelfConnection(String),

    #[error("road name used twice: {0}")]
    DuplicateRoad(String),
}

/// Errors raised while building or querying a plan
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("road {0} is not part of any cycle")]
    UncoverableRoad(String),

    #[error("graph is disconnected: reached {reached} of {total} nodes")]
    DisconnectedGraph { reached: usize, total: usize },

    #[error("more than {0} cycles found")]
    CycleLimitExceeded(usize),

    #[error("lookup failed: {0}")]
    Lookup(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
