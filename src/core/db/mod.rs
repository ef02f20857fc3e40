/// Database Module
///
/// Connection setup and script execution for the gateway.
///
/// ## Architecture
///
/// - **Connection Management** (`connection.rs`): opens SQLite connections,
///   applies the connection pragmas and runs SQL scripts
///
/// Domain statements live with the gateway operations that issue them.
pub mod connection;

pub use connection::*;
