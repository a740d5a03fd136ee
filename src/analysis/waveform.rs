//! Rolling window of the most recent output samples.

use rtrb::Consumer;

pub struct WaveformTap {
    history: Vec<f32>,
    write: usize,
}

impl WaveformTap {
    pub fn new(len: usize) -> Self {
        Self {
            history: vec![0.0; len.max(1)],
            write: 0,
        }
    }

    pub fn push(&mut self, sample: f32) {
        self.history[self.write] = sample;
        self.write = (self.write + 1) % self.history.len();
    }

    /// Pull everything the render thread published since the last call.
    pub fn drain(&mut self, rx: &mut Consumer<f32>) -> usize {
        let mut n = 0;
        while let Ok(sample) = rx.pop() {
            self.push(sample);
            n += 1;
        }
        n
    }

    /// Oldest-to-newest copy of the window into `out` (resized to fit).
    pub fn snapshot(&self, out: &mut Vec<f32>) {
        out.clear();
        out.extend_from_slice(&self.history[self.write..]);
        out.extend_from_slice(&self.history[..self.write]);
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
