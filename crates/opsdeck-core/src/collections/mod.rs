//! Collection types with structural guarantees.
//!
//! - [`BoundedBuffer<T>`]: FIFO buffer that never holds more than its capacity

pub mod bounded_buffer;

pub use bounded_buffer::BoundedBuffer;
