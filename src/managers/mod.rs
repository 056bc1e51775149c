// tabkeeper state managers
// The group index, the event handler that owns it, and the snapshot write queue.

pub mod group_index;
pub mod group_keeper;
pub mod snapshot_writer;
