//! The rendering environment media queries are evaluated against.

use serde::Serialize;

/// [Media Queries 4 § 2.3 Media types](https://www.w3.org/TR/mediaqueries-4/#media-types)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DeviceCategory {
    /// "Matches all devices that aren't matched by print or speech."
    #[default]
    Screen,
    /// "Matches printers, and devices intended to reproduce a printed display."
    Print,
    /// "Matches screenreaders and similar devices that 'read out' a page."
    Speech,
}

impl DeviceCategory {
    /// The media type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Print => "print",
            Self::Speech => "speech",
        }
    }
}

/// [Media Queries 4 § 7.1 pointer](https://www.w3.org/TR/mediaqueries-4/#pointer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Pointer {
    /// "The primary input mechanism of the device does not include a pointing device."
    None,
    /// "includes a pointing device of limited accuracy"
    Coarse,
    /// "includes an accurate pointing device"
    #[default]
    Fine,
}

impl Pointer {
    /// The keyword for this accuracy.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Coarse => "coarse",
            Self::Fine => "fine",
        }
    }
}

/// A read-only snapshot of the output device. Lengths are CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderDevice {
    /// Width of the viewport.
    pub viewport_width: f64,
    /// Height of the viewport.
    pub viewport_height: f64,
    /// Width of the whole rendering surface.
    pub device_width: f64,
    /// Height of the whole rendering surface.
    pub device_height: f64,
    /// Pixel density in dots per inch.
    pub resolution_dpi: f64,
    /// True for character-cell terminals.
    pub is_grid: bool,
    /// True for interlaced displays.
    pub is_interlaced: bool,
    /// Bits per pixel in the monochrome frame buffer; 0 on colour devices.
    pub monochrome_bits: u32,
    /// Accuracy of the primary pointing device.
    pub pointer: Pointer,
    /// Which media type this device belongs to.
    pub category: DeviceCategory,
}

impl Default for RenderDevice {
    fn default() -> Self {
        Self {
            viewport_width: 1024.0,
            viewport_height: 768.0,
            device_width: 1024.0,
            device_height: 768.0,
            resolution_dpi: 96.0,
            is_grid: false,
            is_interlaced: false,
            monochrome_bits: 0,
            pointer: Pointer::Fine,
            category: DeviceCategory::Screen,
        }
    }
}

impl RenderDevice {
    /// A device whose viewport and surface are both `width` by `height`.
    #[must_use]
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            device_width: width,
            device_height: height,
            ..Self::default()
        }
    }
}
