//! A display connection with everything the capture loop needs from it.
//!
//! Resources are released in reverse order of acquisition:
//! the pointer grab goes first (the capture loop's `GrabGuard`), then the
//! crosshair cursor (`Drop` below), then the connection itself (the `conn`
//! field, dropped after `Drop::drop` returns).

use stint_core::color::SERVER_CHANNEL_BITS;
use stint_core::{
    Button, CaptureError, ColorSample, EventSource, PixelSampler, PointerEvent, PointerGrab,
    SampleError, SampleRequest, SetupError,
};
use tracing::{debug, warn};
use x11rb::connection::Connection;
use x11rb::errors::ReplyOrIdError;
use x11rb::protocol::xproto::{
    Colormap, ConnectionExt as _, Cursor, EventMask, GrabMode, GrabStatus, ImageFormat, Window,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::CURRENT_TIME;

use super::image::{bits_per_pixel, decode_pixel, root_coords};

/// Glyph index of the crosshair in the standard X cursor font.
const XC_CROSSHAIR: u16 = 34;

pub struct X11Session {
    conn: RustConnection,
    root: Window,
    colormap: Colormap,
    width: u16,
    height: u16,
    /// Created on first grab; fixed-position runs never need it.
    cursor: Option<Cursor>,
    grabbed: bool,
}

impl X11Session {
    /// Connect to `display`, or `$DISPLAY` when `None`.
    pub fn open(display: Option<&str>) -> Result<Self, SetupError> {
        let (conn, screen_num) =
            x11rb::connect(display).map_err(|e| SetupError::Connect(e.into()))?;

        let screen = conn
            .setup()
            .roots
            .get(screen_num)
            .ok_or(SetupError::NoScreen(screen_num))?;
        let root = screen.root;
        let colormap = screen.default_colormap;
        let width = screen.width_in_pixels;
        let height = screen.height_in_pixels;

        debug!(
            "Connected to screen {} ({}x{}, root {:#x})",
            screen_num, width, height, root
        );

        Ok(Self {
            conn,
            root,
            colormap,
            width,
            height,
            cursor: None,
            grabbed: false,
        })
    }

    fn crosshair_cursor(&mut self) -> Result<Cursor, ReplyOrIdError> {
        if let Some(cursor) = self.cursor {
            return Ok(cursor);
        }

        let font = self.conn.generate_id()?;
        self.conn.open_font(font, b"cursor")?;

        let cursor = self.conn.generate_id()?;
        self.conn.create_glyph_cursor(
            cursor,
            font,
            font,
            XC_CROSSHAIR,
            XC_CROSSHAIR + 1,
            0,
            0,
            0,
            0xFFFF,
            0xFFFF,
            0xFFFF,
        )?;
        self.conn.close_font(font)?;

        self.cursor = Some(cursor);
        Ok(cursor)
    }
}

impl PointerGrab for X11Session {
    fn grab_pointer(&mut self) -> Result<(), SetupError> {
        let cursor = self
            .crosshair_cursor()
            .map_err(|e| SetupError::resource("crosshair cursor", e))?;

        let mask = EventMask::BUTTON_PRESS | EventMask::BUTTON1_MOTION | EventMask::BUTTON_RELEASE;
        let reply = self
            .conn
            .grab_pointer(
                false,
                self.root,
                mask,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                self.root,
                cursor,
                CURRENT_TIME,
            )
            .map_err(|e| SetupError::GrabFailed(e.to_string()))?
            .reply()
            .map_err(|e| SetupError::GrabFailed(e.to_string()))?;

        if reply.status != GrabStatus::SUCCESS {
            return Err(SetupError::GrabFailed(
                grab_status_message(reply.status).to_string(),
            ));
        }

        self.grabbed = true;
        Ok(())
    }

    fn ungrab_pointer(&mut self) {
        if !self.grabbed {
            return;
        }
        self.grabbed = false;

        let result = self
            .conn
            .ungrab_pointer(CURRENT_TIME)
            .and_then(|_| self.conn.flush());
        if let Err(e) = result {
            warn!("Failed to ungrab pointer: {}", e);
        }
    }
}

impl EventSource for X11Session {
    fn next_event(&mut self) -> Result<PointerEvent, CaptureError> {
        loop {
            let event = self.conn.wait_for_event().map_err(CaptureError::events)?;
            if let Some(pointer) = translate_event(&event) {
                return Ok(pointer);
            }
        }
    }
}

impl PixelSampler for X11Session {
    fn sample(&mut self, at: SampleRequest) -> Result<ColorSample, SampleError> {
        let (x, y) = root_coords(at, self.width, self.height)?;

        let image = self
            .conn
            .get_image(ImageFormat::Z_PIXMAP, self.root, x, y, 1, 1, !0)
            .map_err(SampleError::request)?
            .reply()
            .map_err(SampleError::request)?;

        let setup = self.conn.setup();
        let bpp = bits_per_pixel(&setup.pixmap_formats, image.depth).ok_or_else(|| {
            SampleError::UnsupportedFormat(format!("no pixmap format for depth {}", image.depth))
        })?;
        let pixel = decode_pixel(&image.data, bpp, image.depth, setup.image_byte_order)
            .ok_or_else(|| {
                SampleError::UnsupportedFormat(format!(
                    "{} bits per pixel at depth {}",
                    bpp, image.depth
                ))
            })?;

        let colors = self
            .conn
            .query_colors(self.colormap, &[pixel])
            .map_err(SampleError::request)?
            .reply()
            .map_err(SampleError::request)?;
        let rgb = colors.colors.first().ok_or(SampleError::NoColor(pixel))?;

        Ok(ColorSample::from_channels(
            rgb.red,
            rgb.green,
            rgb.blue,
            SERVER_CHANNEL_BITS,
        ))
    }
}

impl Drop for X11Session {
    fn drop(&mut self) {
        // No-op unless a guard was leaked.
        self.ungrab_pointer();

        if let Some(cursor) = self.cursor.take() {
            if let Err(e) = self.conn.free_cursor(cursor) {
                warn!("Failed to free cursor: {}", e);
            }
        }
        if let Err(e) = self.conn.flush() {
            debug!("Failed to flush before closing display: {}", e);
        }
        debug!("Closing display connection");
    }
}

/// Map grabbed-pointer events to capture events. Everything else is `None`.
fn translate_event(event: &Event) -> Option<PointerEvent> {
    match event {
        Event::ButtonPress(e) => Some(PointerEvent::Press {
            button: Button(e.detail),
            x: e.root_x.into(),
            y: e.root_y.into(),
        }),
        Event::ButtonRelease(e) => Some(PointerEvent::Release {
            button: Button(e.detail),
            x: e.root_x.into(),
            y: e.root_y.into(),
        }),
        Event::MotionNotify(e) => Some(PointerEvent::Motion {
            x: e.root_x.into(),
            y: e.root_y.into(),
        }),
        _ => None,
    }
}

fn grab_status_message(status: GrabStatus) -> &'static str {
    match status {
        GrabStatus::SUCCESS => "success",
        GrabStatus::ALREADY_GRABBED => "pointer is grabbed by another client",
        GrabStatus::INVALID_TIME => "request time is out of date",
        GrabStatus::NOT_VIEWABLE => "root window is not viewable",
        GrabStatus::FROZEN => "pointer is frozen by another grab",
        _ => "unknown grab status",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use x11rb::protocol::xproto::{
        ButtonPressEvent, KeyButMask, Motion, MotionNotifyEvent, BUTTON_PRESS_EVENT,
        BUTTON_RELEASE_EVENT, MOTION_NOTIFY_EVENT,
    };

    fn button_event(response_type: u8, detail: u8, root_x: i16, root_y: i16) -> ButtonPressEvent {
        ButtonPressEvent {
            response_type,
            detail,
            sequence: 0,
            time: 0,
            root: 1,
            event: 1,
            child: 0,
            root_x,
            root_y,
            event_x: root_x,
            event_y: root_y,
            state: KeyButMask::from(0u16),
            same_screen: true,
        }
    }

    #[test]
    fn test_translate_press_and_release() {
        let press = Event::ButtonPress(button_event(BUTTON_PRESS_EVENT, 1, 10, 20));
        assert_eq!(
            translate_event(&press),
            Some(PointerEvent::Press {
                button: Button(1),
                x: 10,
                y: 20
            })
        );

        let release = Event::ButtonRelease(button_event(BUTTON_RELEASE_EVENT, 3, 0, 7));
        assert_eq!(
            translate_event(&release),
            Some(PointerEvent::Release {
                button: Button(3),
                x: 0,
                y: 7
            })
        );
    }

    #[test]
    fn test_translate_motion_uses_root_coordinates() {
        let motion = Event::MotionNotify(MotionNotifyEvent {
            response_type: MOTION_NOTIFY_EVENT,
            detail: Motion::NORMAL,
            sequence: 0,
            time: 0,
            root: 1,
            event: 1,
            child: 0,
            root_x: 640,
            root_y: 480,
            event_x: 1,
            event_y: 2,
            state: KeyButMask::BUTTON1,
            same_screen: true,
        });
        assert_eq!(
            translate_event(&motion),
            Some(PointerEvent::Motion { x: 640, y: 480 })
        );
    }

    #[test]
    fn test_translate_ignores_other_events() {
        assert_eq!(translate_event(&Event::Unknown(vec![0; 32])), None);
    }

    #[test]
    fn test_grab_status_messages() {
        assert_eq!(
            grab_status_message(GrabStatus::ALREADY_GRABBED),
            "pointer is grabbed by another client"
        );
        assert_eq!(
            grab_status_message(GrabStatus::FROZEN),
            "pointer is frozen by another grab"
        );
    }
}
