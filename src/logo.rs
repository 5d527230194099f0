use crate::consts;
use ratatui::{
    buffer::Buffer,
    layout::{Offset, Rect},
    text::Text,
    widgets::Widget,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Logo;

impl Logo {
    const SNAKE_WIDTH: u16 = 28;
    const BLOCK_WIDTH: u16 = 25;
    pub(crate) const HEIGHT: u16 = 5;
    pub(crate) const WIDTH: u16 = Self::SNAKE_WIDTH + Self::BLOCK_WIDTH;
}

#[rustfmt::skip]
static SNAKE: &[&str] = &[
     " ____              _        ",
     "/ ___| _ __   __ _| | _____ ",
    r"\___ \| '_ \ / _` | |/ / _ \",
     " ___) | | | | (_| |   <  __/",
    r"|____/|_| |_|\__,_|_|\_\___|",
];

#[rustfmt::skip]
static BLOCK: &[&str] = &[
     " ____  _            _    ",
     "| __ )| | ___   ___| | __",
    r"|  _ \| |/ _ \ / __| |/ /",
     "| |_) | | (_) | (__|   < ",
    r"|____/|_|\___/ \___|_|\_\",
];

impl Widget for Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snake_text = Text::from_iter(SNAKE.iter().copied()).style(consts::SNAKE_STYLE);
        snake_text.render(area, buf);
        let block_text = Text::from_iter(BLOCK.iter().copied()).style(consts::OBSTACLE_STYLE);
        let block_area = area
            .offset(Offset {
                x: Self::SNAKE_WIDTH.into(),
                y: 0,
            })
            .intersection(area);
        block_text.render(block_area, buf);
    }
}
