use crate::frame::Frame;
use crate::store::Db;

/// Applies a command to the key-value state. Only the store actor holds a `Db`, so this is
/// only ever called from there.
pub trait Executable {
    fn exec(self, db: &mut Db) -> Frame;
}
