mod app;
mod cli;
mod dialog;
mod input;
mod screen;
mod ticker;
mod timer;

use app::App;
use clap::Parser;
use input::Fields;
use log::{error, info};
use pixels::{Pixels, SurfaceTexture};
use screen::{Screen, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use ticker::{Notify, TICK_INTERVAL};
use timer::TimerEvent;
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

fn create_window(args: &cli::Args, event_loop: &EventLoop<TimerEvent>) -> (Window, Pixels) {
    let min_size = LogicalSize::new(DISPLAY_WIDTH as f64, DISPLAY_HEIGHT as f64);
    let size = LogicalSize::new(
        (DISPLAY_WIDTH as u32 * args.scale) as f64,
        (DISPLAY_HEIGHT as u32 * args.scale) as f64,
    );
    let window = WindowBuilder::new()
        .with_title("Countdown Timer")
        .with_inner_size(size)
        .with_min_inner_size(min_size)
        .build(event_loop)
        .expect("Failed to create window");

    center_window(&window);

    let size = window.inner_size();
    let surface = SurfaceTexture::new(size.width, size.height, &window);
    let pixels = Pixels::new(DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32, surface)
        .expect("Failed to create the pixel frame buffer");

    (window, pixels)
}

/// Move the window to the middle of the monitor it opened on.
fn center_window(window: &Window) {
    if let Some(monitor) = window.current_monitor() {
        let screen = monitor.size();
        let outer = window.outer_size();
        let origin = monitor.position();

        let x = origin.x + (screen.width.saturating_sub(outer.width) / 2) as i32;
        let y = origin.y + (screen.height.saturating_sub(outer.height) / 2) as i32;
        window.set_outer_position(PhysicalPosition::new(x, y));
    }
}

/// Draw the current state of the app into the window.
///
/// Returns false if rendering failed.
fn render<N: Notify + Clone>(screen: &mut Screen, pixels: &mut Pixels, app: &App<N>) -> bool {
    screen.render(&app.view());
    screen.draw(pixels.get_frame_mut());

    pixels
        .render()
        .map_err(|e| error!("Render failed: {}", e))
        .is_ok()
}

fn main() {
    // Start logger
    env_logger::init();

    // Read command line arguments
    let args = cli::Args::parse();

    // Create window
    let event_loop = EventLoopBuilder::<TimerEvent>::with_user_event().build();
    let (window, mut pixels) = create_window(&args, &event_loop);

    // Create the application context, ticks are posted back into the event loop
    let fields = Fields::new(args.hours, args.minutes, args.seconds);
    let mut app = App::new(fields, args.segments, TICK_INTERVAL, event_loop.create_proxy());
    let mut screen = Screen::new();

    window.set_title(&app.title());
    info!("Countdown timer ready");

    // Start the main loop
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        let alert = match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    app.shutdown();
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                WindowEvent::ReceivedCharacter(c) if c.is_ascii_digit() => {
                    app.fields_mut().push_digit(c);
                    None
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => match key {
                    VirtualKeyCode::Space | VirtualKeyCode::Return => app.toggle(),
                    VirtualKeyCode::R | VirtualKeyCode::Escape => {
                        app.reset();
                        None
                    }
                    VirtualKeyCode::Tab | VirtualKeyCode::Right => {
                        app.fields_mut().focus_next();
                        None
                    }
                    VirtualKeyCode::Left => {
                        app.fields_mut().focus_prev();
                        None
                    }
                    VirtualKeyCode::Up => {
                        app.fields_mut().step(1);
                        None
                    }
                    VirtualKeyCode::Down => {
                        app.fields_mut().step(-1);
                        None
                    }
                    VirtualKeyCode::Back => {
                        app.fields_mut().backspace();
                        None
                    }
                    _ => return,
                },
                WindowEvent::Resized(physical_size) => {
                    pixels.resize_surface(physical_size.width, physical_size.height);
                    window.request_redraw();
                    return;
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    pixels.resize_surface(new_inner_size.width, new_inner_size.height);
                    window.request_redraw();
                    return;
                }
                _ => return,
            },
            Event::UserEvent(event) => app.handle_timer_event(event),
            Event::RedrawRequested(window_id) if window_id == window.id() => {
                if !render(&mut screen, &mut pixels, &app) {
                    app.shutdown();
                    *control_flow = ControlFlow::Exit;
                }
                return;
            }
            _ => return,
        };

        window.set_title(&app.title());
        window.request_redraw();

        if let Some(alert) = alert {
            // The dialog blocks the loop, paint the new state first.
            render(&mut screen, &mut pixels, &app);
            dialog::show(alert);
        }
    });
}
