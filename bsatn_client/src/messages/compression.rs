use bsatn_types::{UnsupportedFeature, WireTag};
use num_derive::{FromPrimitive, ToPrimitive};

/// The compression tag, both for whole server frames and for each query update.
#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, FromPrimitive, ToPrimitive)]
pub enum Compression {
    None = 0,
    Brotli = 1,
    Gzip = 2,
}

impl WireTag for Compression {
    const TYPE_NAME: &'static str = "Compression";
    const VARIANT_COUNT: usize = 3;
}

impl Compression {
    /// `Err` for every scheme this client cannot inflate.
    pub fn check_supported(self) -> Result<(), UnsupportedFeature> {
        match self {
            Self::None => Ok(()),
            Self::Brotli => Err(UnsupportedFeature::BrotliCompression),
            Self::Gzip => Err(UnsupportedFeature::GzipCompression),
        }
    }

    /// The `compression` query parameter value of the subscribe URI.
    pub fn query_value(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Brotli => "Brotli",
            Self::Gzip => "Gzip",
        }
    }
}
