mod message_transport;
pub use message_transport::{MessageTransportClient, VerifiedMessage};

mod token_bridge;
pub use token_bridge::{RedeemedTransfer, TokenBridgeClient};
