pub mod error;
pub mod types;
pub mod util;

pub use error::{ErrorClass, ErrorCode, ErrorContext, Result, WalletError};
pub use types::{parse_sol_amount, Address, Lamports, TxSignature, LAMPORTS_PER_SOL};
pub use util::time::now_nanos;
