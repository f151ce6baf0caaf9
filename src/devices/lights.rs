//! In-memory key light strip

use std::sync::{Arc, Mutex, PoisonError};

use super::{Indicators, Rgb};

/// Key lights held in memory so the terminal display can draw them.
/// Clones share the same pixels.
#[derive(Debug, Clone)]
pub struct SharedLights {
    pixels: Arc<Mutex<Vec<Rgb>>>,
}

impl SharedLights {
    pub fn new(keys: usize) -> Self {
        Self {
            pixels: Arc::new(Mutex::new(vec![Rgb::OFF; keys])),
        }
    }

    pub fn get(&self, key: usize) -> Option<Rgb> {
        self.pixels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    pub fn snapshot(&self) -> Vec<Rgb> {
        self.pixels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_all(&self, color: Rgb) {
        let mut pixels = self.pixels.lock().unwrap_or_else(PoisonError::into_inner);
        pixels.iter_mut().for_each(|pixel| *pixel = color);
    }
}

impl Indicators for SharedLights {
    fn set_pixel(&mut self, key: usize, color: Rgb) {
        let mut pixels = self.pixels.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pixel) = pixels.get_mut(key) {
            *pixel = color;
        }
    }
}
