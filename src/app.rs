use crate::engine::Engine;
use crate::game::Game;
use crate::startup::StartupScreen;
use rand::{rngs::StdRng, Rng};
use ratatui::{backend::Backend, Terminal};
use std::io;

/// The whole program: the current screen plus the engine it plays on.  Every
/// round of a session is played on the same engine.
#[derive(Clone, Debug)]
pub(crate) struct App<R = StdRng> {
    engine: Engine<R>,
    screen: Screen,
}

impl<R: Rng> App<R> {
    pub(crate) fn new(engine: Engine<R>) -> App<R> {
        App {
            engine,
            screen: Screen::Startup(StartupScreen),
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        match self.screen {
            Screen::Startup(ref startup) => {
                terminal.draw(|frame| startup.draw(frame))?;
            }
            Screen::Game(ref game) => {
                terminal.draw(|frame| game.draw(frame, &self.engine))?;
            }
            Screen::Quit => (),
        }
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        let next = match self.screen {
            Screen::Startup(ref startup) => startup.process_input()?,
            Screen::Game(ref mut game) => game.process_input(&mut self.engine)?,
            Screen::Quit => None,
        };
        if let Some(screen) = next {
            self.screen = screen;
        }
        Ok(())
    }

    fn quitting(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Screen {
    Startup(StartupScreen),
    Game(Game),
    Quit,
}
