//! Batch Module
//!
//! Runs a group of store commands inside one MULTI/EXEC block.

use tracing::warn;

use crate::error::Result;
use crate::store::Store;

// == Run Transaction ==
/// Runs `body` between MULTI and EXEC.
///
/// If `body` fails the transaction is discarded and the body's error is
/// returned. A failing DISCARD is logged; the original error still wins.
pub fn run_transaction<S, F, R>(store: &mut S, body: F) -> Result<R>
where
    S: Store + ?Sized,
    F: FnOnce(&mut S) -> Result<R>,
{
    store.multi()?;

    match body(&mut *store) {
        Ok(value) => {
            store.exec()?;
            Ok(value)
        }
        Err(err) => {
            warn!("Transaction aborted: {}", err);
            if let Err(discard_err) = store.discard() {
                warn!("DISCARD failed after aborted transaction: {}", discard_err);
            }
            Err(err)
        }
    }
}
