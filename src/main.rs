use paco8::Console;
use pixels::{Pixels, SurfaceTexture};
use winit::dpi::{PhysicalSize, Size};
use winit::event::MouseButton;
use winit::event_loop::EventLoop;
use winit::keyboard::KeyCode;
use winit::window::WindowBuilder;
use winit_input_helper::WinitInputHelper;

const SCREEN_WIDTH: u32 = 128;
const SCREEN_HEIGHT: u32 = 128;
const DEFAULT_SCALE: u32 = 4;

fn on_screen(x: i32, y: i32) -> bool {
    x >= 0 && x < SCREEN_WIDTH as i32 && y >= 0 && y < SCREEN_HEIGHT as i32
}

fn main() {
    let mut console = match Console::new(SCREEN_WIDTH, SCREEN_HEIGHT) {
        Ok(console) => console,
        Err(err) => {
            println!("Error creating console: {}", err);
            return;
        }
    };

    let event_loop = EventLoop::new().unwrap();
    let mut input = WinitInputHelper::new();

    let window = WindowBuilder::new()
        .with_title("paco-8")
        .with_inner_size(Size::Physical(PhysicalSize::new(
            SCREEN_WIDTH * DEFAULT_SCALE,
            SCREEN_HEIGHT * DEFAULT_SCALE,
        )))
        .build(&event_loop)
        .unwrap();

    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let mut pixels = Pixels::new(SCREEN_WIDTH, SCREEN_HEIGHT, surface_texture).unwrap();

    let mut frame = vec![0u8; console.frame_size()];
    // Previous cursor position, in pixel coordinates; -1 until the cursor
    // first enters the window.
    let (mut last_x, mut last_y) = (-1i32, -1i32);

    let res = event_loop.run(|event, elwt| {
        if input.update(&event) {
            if input.close_requested() || input.key_pressed(KeyCode::Escape) {
                elwt.exit();
                return;
            }
            if let Some(size) = input.window_resized() {
                let _ = pixels.resize_surface(size.width, size.height);
            }

            // Scale the cursor from window coordinates to pixel coordinates.
            let (mouse_x, mouse_y) = match input.cursor() {
                Some((mx, my)) => {
                    let size = window.inner_size();
                    (
                        (mx / size.width as f32 * SCREEN_WIDTH as f32).round() as i32,
                        (my / size.height as f32 * SCREEN_HEIGHT as f32).round() as i32,
                    )
                }
                None => (last_x, last_y),
            };

            // Demo frame: full-screen color noise with a line trailing the
            // cursor, colored by the held button.
            console.cls();
            for x in 0..SCREEN_WIDTH as i32 {
                for y in 0..SCREEN_HEIGHT as i32 {
                    console.pset(x, y, rand::random::<u8>() & 0x0F);
                }
            }
            let cursor_color = if input.mouse_held(MouseButton::Left) {
                6
            } else if input.mouse_held(MouseButton::Right) {
                2
            } else {
                3
            };
            if on_screen(last_x, last_y) || on_screen(mouse_x, mouse_y) {
                console.line(last_x, last_y, mouse_x, mouse_y, cursor_color);
            }
            last_x = mouse_x;
            last_y = mouse_y;

            if let Err(err) = console.flip(&mut frame) {
                println!("Error expanding framebuffer: {}", err);
                elwt.exit();
                return;
            }
            for (dst, src) in pixels
                .frame_mut()
                .chunks_exact_mut(4)
                .zip(frame.chunks_exact(3))
            {
                dst[..3].copy_from_slice(src);
                dst[3] = 0xFF;
            }
            if let Err(err) = pixels.render() {
                println!("Error rendering frame: {}", err);
                elwt.exit();
                return;
            }

            window.request_redraw();
        }
    });
    if let Err(result) = res {
        println!("Error running event loop: {}", result);
    }
}
