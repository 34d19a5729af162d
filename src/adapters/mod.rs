// Adapters layer: file formats the pipeline reads and writes.

pub mod csv_codec;
