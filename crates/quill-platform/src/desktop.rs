//! Desktop runner: a winit window presenting a software [`PixelBuffer`]
//! through `pixels`.

use std::sync::Arc;

use anyhow::Context;
use pixels::{Pixels, SurfaceTexture};
use quill_core::{Color, CompositeMode, FrameInput, PixelBuffer};
use quill_ui::DeferredQueue;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::WinitInput;

/// Called once per frame with a cleared screen, the frame's input and the
/// deferred queue, which is flushed right after.
pub type FrameFn = dyn FnMut(&mut PixelBuffer, &FrameInput, &mut DeferredQueue);

pub struct DesktopConfig {
    pub title: String,
    pub size: PhysicalSize<u32>,
    pub background: Color,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            title: "Quill".into(),
            size: PhysicalSize::new(640, 240),
            background: Color::WHITE,
        }
    }
}

struct App {
    config: DesktopConfig,
    frame: Box<FrameFn>,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    screen: PixelBuffer,
    deferred: DeferredQueue,
    input: WinitInput,
}

impl App {
    fn create_surface(&mut self, el: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = Arc::new(
            el.create_window(
                WindowAttributes::default()
                    .with_title(self.config.title.clone())
                    .with_inner_size(self.config.size),
            )
            .context("create window")?,
        );
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window.clone());
        let pixels = Pixels::new(size.width, size.height, surface).context("create pixels surface")?;
        self.screen.resize(size.width, size.height);
        self.pixels = Some(pixels);
        self.window = Some(window);
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.screen.resize(size.width, size.height);
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(size.width, size.height) {
                log::error!("resize surface: {e}");
            }
            if let Err(e) = pixels.resize_buffer(size.width, size.height) {
                log::error!("resize buffer: {e}");
            }
        }
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let Some(pixels) = &mut self.pixels else {
            return Ok(());
        };
        let background = self.config.background;
        let bounds = self.screen.bounds();
        self.screen.fill_rect(bounds, background, CompositeMode::Copy);

        (self.frame)(&mut self.screen, self.input.frame(), &mut self.deferred);
        self.deferred.flush(&mut self.screen);
        self.input.end_frame();

        for (dst, c) in pixels
            .frame_mut()
            .chunks_exact_mut(4)
            .zip(self.screen.pixels())
        {
            dst.copy_from_slice(&[c.0, c.1, c.2, c.3]);
        }
        pixels.render().context("present frame")
    }
}

impl ApplicationHandler<()> for App {
    fn resumed(&mut self, el: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_surface(el) {
            log::error!("{e:#}");
            el.exit();
        }
    }

    fn window_event(&mut self, el: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested");
                el.exit();
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    log::error!("{e:#}");
                    el.exit();
                }
            }
            other => {
                self.input.handle_event(&other);
            }
        }
    }

    fn about_to_wait(&mut self, _el: &ActiveEventLoop) {
        // Key repeat and caret blink are time driven, so keep frames coming.
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }
}

pub fn run_desktop(
    config: DesktopConfig,
    frame: impl FnMut(&mut PixelBuffer, &FrameInput, &mut DeferredQueue) + 'static,
) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App {
        config,
        frame: Box::new(frame),
        window: None,
        pixels: None,
        screen: PixelBuffer::default(),
        deferred: DeferredQueue::new(),
        input: WinitInput::new(),
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}
