//! Line-oriented terminal backend.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use rewind_rendering::{FrameInput, Presentation, RenderingBackend, Scene};

/// Input line that ends the game.
pub(crate) const QUIT_KEY: &str = "q";

/// Backend that reads one key per line and prints each scene as text.
#[derive(Debug)]
pub(crate) struct TerminalBackend<R, W> {
    input: R,
    output: W,
}

impl<R, W> TerminalBackend<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Creates a backend reading keys from `input` and printing to `output`.
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn present(&mut self, scene: &Scene) -> Result<()> {
        writeln!(self.output, "{}", scene.frame.to_masked_string())?;
        writeln!(self.output)?;
        writeln!(self.output, "{}", scene.stats)?;
        for message in &scene.messages {
            writeln!(self.output, "{message}")?;
        }
        writeln!(self.output)?;
        self.output.flush().context("failed to flush terminal output")
    }
}

impl<R, W> RenderingBackend for TerminalBackend<R, W>
where
    R: BufRead,
    W: Write,
{
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> Result<()>,
    {
        let Presentation { title, mut scene } = presentation;
        writeln!(self.output, "{title}")?;
        self.present(&scene)?;

        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read key from input")?;
            if read == 0 {
                break;
            }

            let key = line.trim();
            if key.is_empty() {
                continue;
            }
            if key == QUIT_KEY {
                break;
            }

            update_scene(
                FrameInput {
                    key: key.to_owned(),
                },
                &mut scene,
            )?;
            self.present(&scene)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scene(stats: &str) -> Scene {
        Scene::new(Default::default(), stats.to_owned(), Vec::new())
    }

    fn play(keys: &str) -> (Vec<String>, String) {
        let mut received = Vec::new();
        let mut output = Vec::new();
        let backend = TerminalBackend::new(Cursor::new(keys.to_owned()), &mut output);

        backend
            .run(Presentation::new("Title", scene("start")), |input, scene| {
                scene.stats = format!("after {}", input.key);
                received.push(input.key);
                Ok(())
            })
            .expect("backend runs");

        (received, String::from_utf8(output).expect("utf-8 output"))
    }

    #[test]
    fn keys_are_forwarded_until_quit() {
        let (received, output) = play("l\n\n j \nq\nk\n");

        assert_eq!(received, vec!["l", "j"]);
        assert!(output.starts_with("Title\n"));
        assert!(output.contains("after l"));
        assert!(output.contains("after j"));
        assert!(!output.contains("after k"));
    }

    #[test]
    fn end_of_input_stops_the_backend() {
        let (received, output) = play("h");

        assert_eq!(received, vec!["h"]);
        assert!(output.contains("start"));
        assert!(output.ends_with("after h\n\n"));
    }

    #[test]
    fn update_errors_propagate() {
        let backend = TerminalBackend::new(Cursor::new("l\n"), Vec::new());

        let result = backend.run(Presentation::new("Title", scene("start")), |_, _| {
            anyhow::bail!("scene failed")
        });

        assert!(result.is_err());
    }
}
