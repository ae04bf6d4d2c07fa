//! # Adapters Layer
//!
//! Outbound port implementations over an Ethereum JSON-RPC endpoint.

pub mod abi;
pub mod json_rpc;
pub mod rewards_pool;

pub use json_rpc::JsonRpcExecutionClient;
pub use rewards_pool::JsonRpcRewardsPool;
