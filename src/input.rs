use winit::{
    event::{ElementState, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// The subset of window events the render loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputEvent {
    CloseRequested,
    Resized { width: u32, height: u32 },
    Key { code: KeyCode, pressed: bool },
    Redraw,
}

impl InputEvent {
    /// Translates a winit event, dropping everything the loop does not use.
    pub(crate) fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CloseRequested => Some(Self::CloseRequested),
            WindowEvent::Resized(size) => Some(Self::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) => Some(Self::Key {
                    code,
                    pressed: event.state == ElementState::Pressed,
                }),
                PhysicalKey::Unidentified(_) => None,
            },
            WindowEvent::RedrawRequested => Some(Self::Redraw),
            _ => None,
        }
    }
}
