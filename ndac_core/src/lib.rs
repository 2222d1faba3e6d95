pub mod array;
pub mod codec;
pub mod dtype;
pub mod error;
pub mod format;
pub mod npy;
pub mod pipeline;
pub mod policy;

pub use array::NdArray;
pub use codec::{Codec, CodecChoice, CodecId};
pub use dtype::Dtype;
pub use error::{CodecError, Error, FormatError, InputError, Result};
pub use format::ContainerHeader;
pub use policy::{SelectionPolicy, ThresholdRule};
