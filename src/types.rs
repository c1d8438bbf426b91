//! Type definitions, flag sets and enums passed to native calls.

use std::ops::BitOr;
use std::path::PathBuf;

use crate::ffi::{self, cl_context_properties, cl_image_format};
use crate::handle::{Handle, Platform};

macro_rules! define_flags {
    ($(#[$meta:meta])* $name:ident: $raw:ty { $($(#[$fmeta:meta])* $flag:ident = $value:expr;)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name($raw);

        impl $name {
            $(
                $(#[$fmeta])*
                pub const $flag: $name = $name($value);
            )*

            /// Wrap a raw bit pattern, keeping unknown bits.
            pub const fn from_bits(bits: $raw) -> Self {
                $name(bits)
            }

            /// The raw bit pattern.
            pub const fn bits(self) -> $raw {
                self.0
            }

            /// Check whether every bit of `other` is set.
            pub const fn contains(self, other: $name) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl BitOr for $name {
            type Output = $name;

            fn bitor(self, rhs: $name) -> $name {
                $name(self.0 | rhs.0)
            }
        }
    };
}

define_flags! {
    /// Device type filter for device queries and context creation.
    DeviceType: u64 {
        /// The platform's default device.
        DEFAULT = 1 << 0;
        /// Host processor.
        CPU = 1 << 1;
        /// Graphics processor.
        GPU = 1 << 2;
        /// Dedicated accelerator.
        ACCELERATOR = 1 << 3;
        /// Every device.
        ALL = 0xFFFF_FFFF;
    }
}

define_flags! {
    /// Memory object allocation and access flags.
    MemFlags: u64 {
        /// Kernels read and write.
        READ_WRITE = 1 << 0;
        /// Kernels only write.
        WRITE_ONLY = 1 << 1;
        /// Kernels only read.
        READ_ONLY = 1 << 2;
        /// Use the host pointer as storage.
        USE_HOST_PTR = 1 << 3;
        /// Allocate host-accessible storage.
        ALLOC_HOST_PTR = 1 << 4;
        /// Copy from the host pointer at creation.
        COPY_HOST_PTR = 1 << 5;
    }
}

define_flags! {
    /// Command queue properties.
    CommandQueueProperties: u64 {
        /// Commands may execute out of order.
        OUT_OF_ORDER_EXEC_MODE_ENABLE = 1 << 0;
        /// Record profiling information for commands.
        PROFILING_ENABLE = 1 << 1;
    }
}

/// Order of the channels of an image element.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelOrder {
    R = 0x10B0,
    A = 0x10B1,
    Rg = 0x10B2,
    Ra = 0x10B3,
    Rgb = 0x10B4,
    Rgba = 0x10B5,
    Bgra = 0x10B6,
    Argb = 0x10B7,
    Intensity = 0x10B8,
    Luminance = 0x10B9,
}

/// Data type of each channel of an image element.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelType {
    SnormInt8 = 0x10D0,
    SnormInt16 = 0x10D1,
    UnormInt8 = 0x10D2,
    UnormInt16 = 0x10D3,
    UnormShort565 = 0x10D4,
    UnormShort555 = 0x10D5,
    UnormInt101010 = 0x10D6,
    SignedInt8 = 0x10D7,
    SignedInt16 = 0x10D8,
    SignedInt32 = 0x10D9,
    UnsignedInt8 = 0x10DA,
    UnsignedInt16 = 0x10DB,
    UnsignedInt32 = 0x10DC,
    HalfFloat = 0x10DD,
    Float = 0x10DE,
}

/// Sampler behavior for out-of-range image coordinates.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressingMode {
    None = 0x1130,
    #[default]
    ClampToEdge = 0x1131,
    Clamp = 0x1132,
    Repeat = 0x1133,
    MirroredRepeat = 0x1134,
}

/// Sampler filter.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    #[default]
    Nearest = 0x1140,
    Linear = 0x1141,
}

/// Image format descriptor, laid out exactly like the native one.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFormat {
    channel_order: ChannelOrder,
    channel_type: ChannelType,
}

impl ImageFormat {
    pub const fn new(channel_order: ChannelOrder, channel_type: ChannelType) -> Self {
        Self {
            channel_order,
            channel_type,
        }
    }

    pub const fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    pub const fn channel_type(&self) -> ChannelType {
        self.channel_type
    }

    pub fn set_channel_order(&mut self, channel_order: ChannelOrder) {
        self.channel_order = channel_order;
    }

    pub fn set_channel_type(&mut self, channel_type: ChannelType) {
        self.channel_type = channel_type;
    }

    pub(crate) fn to_raw(self) -> cl_image_format {
        cl_image_format {
            image_channel_order: self.channel_order as u32,
            image_channel_data_type: self.channel_type as u32,
        }
    }
}

/// One `(name, value)` entry of a context property list.
///
/// The native list is a flat array of `intptr_t` terminated by a zero name;
/// [`ContextProperty::ZERO`] is that terminator.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextProperty {
    name: cl_context_properties,
    value: cl_context_properties,
}

impl ContextProperty {
    /// List terminator.
    pub const ZERO: ContextProperty = ContextProperty { name: 0, value: 0 };

    /// Restrict the context to one platform.
    pub fn platform(platform: Platform) -> Self {
        Self {
            name: ffi::CL_CONTEXT_PLATFORM,
            value: platform.address() as cl_context_properties,
        }
    }

    /// Raw property entry for properties this crate has no constructor for.
    pub const fn raw(name: cl_context_properties, value: cl_context_properties) -> Self {
        Self { name, value }
    }

    pub const fn name(&self) -> cl_context_properties {
        self.name
    }

    pub const fn value(&self) -> cl_context_properties {
        self.value
    }

    /// Build a zero-terminated list for the native call.
    ///
    /// Returns `None` for an empty list so the native call receives null.
    pub(crate) fn terminated(properties: &[ContextProperty]) -> Option<Vec<ContextProperty>> {
        if properties.is_empty() {
            return None;
        }
        let mut list: Vec<ContextProperty> = properties
            .iter()
            .copied()
            .take_while(|p| p.name != 0)
            .collect();
        list.push(ContextProperty::ZERO);
        Some(list)
    }
}

/// Options for loading the OpenCL library.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Library to open. When `None`, the `CLHANDLE_OPENCL_LIBRARY`
    /// environment variable and then the platform defaults are tried.
    pub library_path: Option<PathBuf>,
}

impl LoadOptions {
    /// Options that open a specific library file.
    pub fn with_library(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }
}
