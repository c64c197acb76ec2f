//! Integration Tests Module
//!
//! Test categories:
//! - `derivation_flow`: TON key to Stellar address mapping and keypair utilities
//! - `session_flow`: the bridge session end to end against stub collaborators
//! - `horizon_flow`: HTTP clients against mocked Horizon and friendbot servers


mod derivation_flow;
mod horizon_flow;
mod session_flow;
