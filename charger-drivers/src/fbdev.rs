//! Linux framebuffer device backend
//!
//! Queries the panel geometry with `FBIOGET_VSCREENINFO` and
//! `FBIOGET_FSCREENINFO`, then writes each finished frame row by row at
//! `line_length` pitch. Only 32 bpp panels are supported.

use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::os::unix::fs::FileExt;
use std::path::PathBuf;

use charger_display::{DisplayBackend, DisplayError, PixelFormat, Surface};
use log::{error, info};

pub const FB_DEVICE_PATH: &str = "/dev/graphics/fb0";

const FBIOGET_VSCREENINFO: u32 = 0x4600;
const FBIOGET_FSCREENINFO: u32 = 0x4602;
const FBIOBLANK: u32 = 0x4611;

const FB_BLANK_UNBLANK: libc::c_int = 0;
const FB_BLANK_POWERDOWN: libc::c_int = 4;

/// Kernel `struct fb_bitfield`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct FbBitfield {
    offset: u32,
    length: u32,
    msb_right: u32,
}

/// Kernel `struct fb_var_screeninfo`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct FbVarScreeninfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitfield,
    green: FbBitfield,
    blue: FbBitfield,
    transp: FbBitfield,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

/// Kernel `struct fb_fix_screeninfo`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct FbFixScreeninfo {
    id: [u8; 16],
    smem_start: libc::c_ulong,
    smem_len: u32,
    kind: u32,
    type_aux: u32,
    visual: u32,
    xpanstep: u16,
    ypanstep: u16,
    ywrapstep: u16,
    line_length: u32,
    mmio_start: libc::c_ulong,
    mmio_len: u32,
    accel: u32,
    capabilities: u16,
    reserved: [u16; 2],
}

/// Geometry of an opened framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    width: u32,
    height: u32,
    line_length: u32,
    /// Red lives in the third byte; swap red and blue on write
    bgr: bool,
}

/// `/dev/graphics/fb0` style framebuffer device
#[derive(Debug)]
pub struct FbdevBackend {
    path: PathBuf,
    device: Option<File>,
    geometry: Option<Geometry>,
    row: Vec<u8>,
}

impl FbdevBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            device: None,
            geometry: None,
            row: Vec::new(),
        }
    }

    fn query<T: Default>(device: &File, request: u32) -> Result<T, DisplayError> {
        let mut info = T::default();
        // SAFETY: `info` is a repr(C) mirror of the structure the request
        // fills and is exclusively borrowed for the call.
        let ret = unsafe { libc::ioctl(device.as_raw_fd(), request as _, &mut info as *mut T) };
        if ret < 0 {
            error!("ioctl {:#x} failed: {}", request, std::io::Error::last_os_error());
            return Err(DisplayError::NotAvailable);
        }
        Ok(info)
    }
}

impl DisplayBackend for FbdevBackend {
    fn init(&mut self) -> Result<Surface, DisplayError> {
        let device = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| {
                error!("open {} failed: {}", self.path.display(), e);
                DisplayError::NotAvailable
            })?;

        let var: FbVarScreeninfo = Self::query(&device, FBIOGET_VSCREENINFO)?;
        let fix: FbFixScreeninfo = Self::query(&device, FBIOGET_FSCREENINFO)?;

        if var.bits_per_pixel != 32 {
            error!("framebuffer is {} bpp", var.bits_per_pixel);
            return Err(DisplayError::UnsupportedFormat);
        }

        let geometry = Geometry {
            width: var.xres,
            height: var.yres,
            line_length: fix.line_length,
            bgr: var.red.offset == 16,
        };
        info!(
            "framebuffer {}x{} pitch {} {}",
            geometry.width,
            geometry.height,
            geometry.line_length,
            if geometry.bgr { "BGRX" } else { "RGBX" }
        );

        self.row = vec![0; geometry.width as usize * 4];
        self.device = Some(device);
        self.geometry = Some(geometry);
        Ok(Surface::new(geometry.width, geometry.height, PixelFormat::Rgbx8888))
    }

    fn flip(&mut self, frame: Surface) -> Result<Surface, DisplayError> {
        let (Some(device), Some(geometry)) = (self.device.as_ref(), self.geometry) else {
            return Err(DisplayError::NotAvailable);
        };
        if (frame.width(), frame.height()) != (geometry.width, geometry.height) {
            return Err(DisplayError::UnsupportedFormat);
        }

        for (y, src) in frame.data().chunks_exact(frame.stride()).enumerate() {
            let row: &[u8] = if geometry.bgr {
                for (dst, px) in self.row.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                    dst.copy_from_slice(&[px[2], px[1], px[0], px[3]]);
                }
                &self.row
            } else {
                src
            };

            let offset = y as u64 * u64::from(geometry.line_length);
            device.write_all_at(row, offset).map_err(|e| {
                error!("framebuffer write failed: {}", e);
                DisplayError::Io
            })?;
        }

        Ok(frame)
    }

    fn blank(&mut self, blank: bool) -> Result<(), DisplayError> {
        let Some(device) = self.device.as_ref() else {
            return Err(DisplayError::NotAvailable);
        };
        let mode = if blank { FB_BLANK_POWERDOWN } else { FB_BLANK_UNBLANK };

        // SAFETY: FBIOBLANK takes its argument by value.
        let ret = unsafe { libc::ioctl(device.as_raw_fd(), FBIOBLANK as _, mode) };
        if ret < 0 {
            error!("FBIOBLANK {} failed: {}", mode, std::io::Error::last_os_error());
            return Err(DisplayError::Blank);
        }
        Ok(())
    }
}
