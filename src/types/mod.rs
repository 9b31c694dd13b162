mod flow;

pub use flow::Flow;

pub type AccountId = String;
