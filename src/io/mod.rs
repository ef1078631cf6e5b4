/*!
# IO utilities

Reading of the input corpus, column resolution, annotated table writing and checkpointing.

Every output file is written atomically (see [writer::write_table]).
!*/
pub mod checkpoint;
pub mod columns;
pub mod table;
pub mod writer;

pub use checkpoint::CheckpointWriter;
pub use columns::{Alias, ResolvedColumn};
pub use table::Table;
pub use writer::{Annotations, TableWriter};
