pub mod config;
pub mod proxy;
pub mod rules;

pub use config::Config;
pub use proxy::{DispatchResult, Fallback, ForwardingDispatcher, InboundRequest, ProxyServer};
pub use rules::RuleTable;
