mod collect;
mod parse;
mod payload;

pub use collect::{InputSource, LoadRequest, apply_caps, load_graph};
pub use parse::parse_payload;
pub use payload::{Coverage, GraphPayload, GraphStats, RawEdge, RawNode};
