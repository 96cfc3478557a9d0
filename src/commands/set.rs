use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Db;

/// Set `key` to hold `value`, overwriting any previous value.
///
/// The value is a single token: anything after it on the line is ignored.
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: String,
}

impl Executable for Set {
    fn exec(self, db: &mut Db) -> Frame {
        db.set(self.key, self.value);
        Frame::ok()
    }
}

impl TryFrom<&mut CommandParser> for Set {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = parser.next_string()?;

        Ok(Self { key, value })
    }
}
