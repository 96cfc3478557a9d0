use std::fmt;

static LF: &[u8; 1] = b"\n";
static ERROR_PREFIX: &str = "ERR ";

/// A single reply line sent back to a client.
///
/// There is no typed distinction between success and failure on the wire: both are plain
/// lines, and errors are recognized by their leading `ERR` token.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
}

impl Frame {
    pub fn ok() -> Frame {
        Frame::Simple("OK".to_string())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Frame::Error(_))
    }

    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Frame::Simple(s) => {
                let mut bytes = Vec::with_capacity(s.len() + LF.len());
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(LF);
                bytes
            }
            Frame::Error(msg) => {
                let mut bytes = Vec::with_capacity(ERROR_PREFIX.len() + msg.len() + LF.len());
                bytes.extend_from_slice(ERROR_PREFIX.as_bytes());
                bytes.extend_from_slice(msg.as_bytes());
                bytes.extend_from_slice(LF);
                bytes
            }
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "{}", s),
            Frame::Error(msg) => write!(f, "{}{}", ERROR_PREFIX, msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_simple_frame() {
        let frame = Frame::Simple("11".to_string());
        assert_eq!(frame.serialize(), b"11\n".to_vec());
    }

    #[test]
    fn serialize_empty_simple_frame() {
        // A missing key is answered with an empty line.
        let frame = Frame::Simple(String::new());
        assert_eq!(frame.serialize(), b"\n".to_vec());
    }

    #[test]
    fn serialize_error_frame() {
        let frame = Frame::Error("unknown command".to_string());
        assert_eq!(frame.serialize(), b"ERR unknown command\n".to_vec());
        assert!(frame.is_error());
    }

    #[test]
    fn display_matches_wire_text_without_terminator() {
        assert_eq!(Frame::ok().to_string(), "OK");
        assert_eq!(
            Frame::Error("value is not an integer or out of range".to_string()).to_string(),
            "ERR value is not an integer or out of range"
        );
    }
}
