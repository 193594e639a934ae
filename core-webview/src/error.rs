use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebViewError {
    #[error("Loader is already attached to the web view")]
    AlreadyAttached,

    #[error("Loader is not attached to a web view")]
    NotAttached,

    #[error("Web view bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Runtime(#[from] core_runtime::Error),
}

pub type Result<T> = std::result::Result<T, WebViewError>;
