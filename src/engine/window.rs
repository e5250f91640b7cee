use glam::Vec2;
use sdl2::event::{Event, WindowEvent};
use sdl2::joystick::Joystick;
use sdl2::keyboard::Scancode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::EventPump;

use crate::components::{DinoWorld, Hitbox};
use crate::engine::input::{Input, InputState, Key};
use crate::error::{GameError, Result};
use crate::obstacle::Treadmill;

/// Screen row of the floor line.
const GROUND_Y: i32 = 300;
/// Screen column of the dino.
const DINO_X: i32 = 100;

const BACKGROUND: Color = Color::RGB(247, 247, 247);
const INK: Color = Color::RGB(83, 83, 83);

/// SDL2 window, event pump and the first joypad, if one is plugged in.
pub struct WindowHost {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    _joystick: Option<Joystick>,
}

impl WindowHost {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let sdl = sdl2::init().map_err(GameError::Window)?;
        let video = sdl.video().map_err(GameError::Window)?;

        let window = video
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| GameError::Window(e.to_string()))?;
        let canvas = window
            .into_canvas()
            .present_vsync()
            .build()
            .map_err(|e| GameError::Window(e.to_string()))?;

        let joystick = match sdl.joystick() {
            Ok(subsystem) if subsystem.num_joysticks().unwrap_or(0) > 0 => match subsystem.open(0) {
                Ok(pad) => {
                    tracing::info!(name = %pad.name(), "joypad connected");
                    Some(pad)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "could not open joypad");
                    None
                }
            },
            _ => None,
        };

        let event_pump = sdl.event_pump().map_err(GameError::Window)?;
        Ok(Self {
            canvas,
            event_pump,
            _joystick: joystick,
        })
    }

    /// Drain pending SDL events into `input`. Returns the new focus state if
    /// the window gained or lost focus.
    pub fn poll(&mut self, input: &mut InputState) -> Option<bool> {
        let mut focus = None;
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => input.quit = true,
                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => input.quit = true,
                Event::KeyDown {
                    scancode: Some(sc),
                    repeat: false,
                    ..
                } => {
                    if let Some(key) = key_for(sc) {
                        input.press(Input::Key(key));
                    }
                }
                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if let Some(key) = key_for(sc) {
                        input.release(Input::Key(key));
                    }
                }
                Event::JoyButtonDown { button_idx, .. } => input.press(Input::Button(button_idx)),
                Event::JoyButtonUp { button_idx, .. } => input.release(Input::Button(button_idx)),
                Event::Window {
                    win_event: WindowEvent::FocusGained,
                    ..
                } => focus = Some(true),
                Event::Window {
                    win_event: WindowEvent::FocusLost,
                    ..
                } => focus = Some(false),
                _ => {}
            }
        }
        focus
    }

    /// Flat boxes for the floor, the dino and the obstacles.
    pub fn draw(&mut self, world: &DinoWorld, treadmill: &Treadmill) {
        let (width, _) = self.canvas.output_size().unwrap_or((800, 400));

        let mut boxes = Vec::with_capacity(treadmill.obstacles.len() + 2);
        boxes.push(Rect::new(0, GROUND_Y, width, 2));
        boxes.push(screen_rect(world.hitbox_centre(), world.hitbox));
        boxes.extend(
            treadmill
                .obstacles
                .iter()
                .map(|o| screen_rect(o.centre(), o.kind.hitbox())),
        );

        self.canvas.set_draw_color(BACKGROUND);
        self.canvas.clear();
        self.canvas.set_draw_color(INK);
        if let Err(e) = self.canvas.fill_rects(&boxes) {
            tracing::warn!(error = %e, "could not draw frame");
        }
        self.canvas.present();
    }

    pub fn set_status(&mut self, status: &str) {
        if let Err(e) = self.canvas.window_mut().set_title(status) {
            tracing::warn!(error = %e, "could not set window title");
        }
    }
}

/// Track coordinates (dino at x = 0, floor at y = 0) to screen pixels.
fn screen_rect(centre: Vec2, hitbox: Hitbox) -> Rect {
    let half = hitbox.half_extents;
    Rect::new(
        DINO_X + (centre.x - half.x) as i32,
        GROUND_Y + (centre.y - half.y) as i32,
        (2.0 * half.x) as u32,
        (2.0 * half.y) as u32,
    )
}

fn key_for(sc: Scancode) -> Option<Key> {
    let key = match sc {
        Scancode::Space => Key::Space,
        Scancode::Up => Key::Up,
        Scancode::Down => Key::Down,
        Scancode::Left => Key::Left,
        Scancode::Right => Key::Right,
        Scancode::W => Key::W,
        Scancode::S => Key::S,
        Scancode::B => Key::B,
        Scancode::P => Key::P,
        Scancode::Return => Key::Return,
        Scancode::Escape => Key::Escape,
        _ => return None,
    };
    Some(key)
}
