use crate::editor::{Formats, Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub control: bool,
    pub platform: bool,
    pub shift: bool,
    pub alt: bool,
}

/// A key press as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: char,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: char, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// `key` with the platform's shortcut modifier held (cmd on macOS, ctrl elsewhere).
    pub fn short(key: char) -> Self {
        let mut modifiers = Modifiers::default();
        if cfg!(target_os = "macos") {
            modifiers.platform = true;
        } else {
            modifiers.control = true;
        }
        Self { key, modifiers }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: char,
    pub short_key: bool,
    pub shift_key: bool,
}

impl KeyBinding {
    pub fn short(key: char) -> Self {
        Self {
            key,
            short_key: true,
            shift_key: false,
        }
    }

    fn matches(&self, press: &KeyPress) -> bool {
        let short_held = if cfg!(target_os = "macos") {
            press.modifiers.platform
        } else {
            press.modifiers.control
        };
        press.key.eq_ignore_ascii_case(&self.key)
            && short_held == self.short_key
            && press.modifiers.shift == self.shift_key
            && !press.modifiers.alt
    }
}

/// What a binding handler sees besides the range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingContext {
    pub format: Formats,
}

pub type BindingHandler = Box<dyn FnMut(Range, &BindingContext)>;

/// Keyboard binding registrar. The host dispatches key presses into it.
#[derive(Default)]
pub struct Keyboard {
    bindings: Vec<(KeyBinding, BindingHandler)>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_binding(
        &mut self,
        binding: KeyBinding,
        handler: impl FnMut(Range, &BindingContext) + 'static,
    ) {
        self.bindings.push((binding, Box::new(handler)));
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Run the first binding matching `press`. Returns whether one ran.
    pub fn dispatch(&mut self, press: KeyPress, range: Range, context: &BindingContext) -> bool {
        let Some((_, handler)) = self
            .bindings
            .iter_mut()
            .find(|(binding, _)| binding.matches(&press))
        else {
            return false;
        };
        handler(range, context);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn short_binding_requires_platform_modifier() {
        let hits = Rc::new(Cell::new(0));
        let mut keyboard = Keyboard::new();
        {
            let hits = hits.clone();
            keyboard.add_binding(KeyBinding::short('k'), move |_, _| {
                hits.set(hits.get() + 1)
            });
        }

        let context = BindingContext::default();
        assert!(!keyboard.dispatch(
            KeyPress::new('k', Modifiers::default()),
            Range::caret(0),
            &context
        ));
        assert!(keyboard.dispatch(KeyPress::short('K'), Range::caret(0), &context));

        let mut shifted = KeyPress::short('k');
        shifted.modifiers.shift = true;
        assert!(!keyboard.dispatch(shifted, Range::caret(0), &context));
        assert_eq!(hits.get(), 1);
    }
}
