/// Segment table, label anchors, and pointer/winner lookup.
pub mod segments;
