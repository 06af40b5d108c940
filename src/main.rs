//! softpipe viewer
//!
//! Renders the demo scene with the software rasterizer every frame and
//! stretches the result over a macroquad window.
//! - F12 saves the last frame to `screenshot.png`
//! - Escape quits

use macroquad::prelude::*;
use softpipe::config::{load_config_or_default, ViewerConfig, DEFAULT_CONFIG_PATH};
use softpipe::logging::init_logging;
use softpipe::present::{save_png, to_rgba8};
use softpipe::rasterizer::GraphicsContext;
use softpipe::scene::Renderer;
use softpipe::VERSION;

const SCREENSHOT_PATH: &str = "screenshot.png";

fn window_conf() -> Conf {
    // Window size comes from the config, which is read again in main
    let config = load_config_or_default(DEFAULT_CONFIG_PATH);
    Conf {
        window_title: "Software Rasterizer".to_owned(),
        window_width: config.window_width as i32,
        window_height: config.window_height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config: ViewerConfig = load_config_or_default(DEFAULT_CONFIG_PATH);
    init_logging(config.log_filter.as_deref());

    let (width, height) = config.render_size();
    let mut ctx = GraphicsContext::init(width, height);
    let renderer = Renderer::new(&mut ctx, &config);
    let mut frame = vec![0u32; width * height];

    log::info!("=== softpipe v{} ({}x{}) ===", VERSION, width, height);

    let mut t = 0.0f32;
    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        let frame_start = get_time();
        renderer.draw_scene(&mut ctx, t);
        ctx.swap_buffers(&mut frame);
        let render_ms = (get_time() - frame_start) * 1000.0;
        t += get_frame_time();

        if is_key_pressed(KeyCode::F12) {
            if let Err(e) = save_png(SCREENSHOT_PATH, &frame, width, height) {
                log::error!("{}", e);
            }
        }

        // Convert framebuffer to texture and draw to window (render_size fits u16)
        let texture = Texture2D::from_rgba8(width as u16, height as u16, &to_rgba8(&frame));
        texture.set_filter(FilterMode::Nearest);

        clear_background(BLACK);
        draw_texture_ex(
            &texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(screen_width(), screen_height())),
                ..Default::default()
            },
        );
        draw_text(
            &format!("{:.2} ms | {} fps", render_ms, get_fps()),
            8.0,
            20.0,
            20.0,
            Color::from_rgba(230, 230, 230, 255),
        );

        next_frame().await;
    }

    let released = ctx.shutdown();
    log::info!("Released {} bytes", released);
}
