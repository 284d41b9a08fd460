// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pretty printers for reporting information and deferred warnings.

use std::{borrow::Cow, sync::Mutex};

use log::Level;

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

lazy_static::lazy_static! {
    static ref QUEUED_WARNINGS: Mutex<Vec<Vec<Cow<'static, str>>>> = Mutex::new(vec![]);
}

type Block = Vec<Cow<'static, str>>;

/// Log `blocks` under a bold title, drawing a tree down the left side. The
/// first line of each block gets a branch.
fn log_tree(level: Level, title: &str, blocks: &[Block]) {
    log::log!(level, "{}", console::style(title).bold());
    let num_blocks = blocks.len();
    for (i_block, block) in blocks.iter().enumerate() {
        let last_block = i_block + 1 == num_blocks;
        for (i_line, line) in block.iter().enumerate() {
            let symbol = match (i_line, block.len() == 1, last_block) {
                (0, true, true) => UP_AND_RIGHT,
                (0, _, _) => VERTICAL_AND_RIGHT,
                _ => VERTICAL,
            };
            log::log!(level, "{symbol} {line}");
        }
    }
    log::log!(level, "");
}

/// Collects information on what is about to be done, and prints it all at
/// once.
pub(crate) struct InfoPrinter {
    title: Cow<'static, str>,
    blocks: Vec<Block>,
}

impl InfoPrinter {
    pub(crate) fn new(title: Cow<'static, str>) -> Self {
        Self {
            title,
            blocks: vec![],
        }
    }

    pub(crate) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push(vec![line]);
    }

    pub(crate) fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub(crate) fn display(self) {
        log_tree(Level::Info, &self.title, &self.blocks);
    }
}

/// Something that can be queued as a warning. Warnings are shown together
/// with [`display_warnings`], rather than interrupting the rest of the output.
pub(crate) trait Warn {
    fn warn(self);
}

fn queue(block: Block) {
    // The queue is still usable if another thread panicked while holding it.
    let mut queue = QUEUED_WARNINGS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    queue.push(block);
}

impl Warn for &'static str {
    fn warn(self) {
        queue(vec![self.into()]);
    }
}

impl Warn for String {
    fn warn(self) {
        queue(vec![self.into()]);
    }
}

impl Warn for Cow<'static, str> {
    fn warn(self) {
        queue(vec![self]);
    }
}

impl Warn for Vec<Cow<'static, str>> {
    fn warn(self) {
        queue(self);
    }
}

/// Print out (and clear) any warnings that have been queued. This should be
/// called once all arguments have been parsed into parameters.
pub(crate) fn display_warnings() {
    log::debug!("Displaying warnings");
    let blocks = std::mem::take(
        &mut *QUEUED_WARNINGS
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()),
    );
    if !blocks.is_empty() {
        log_tree(Level::Warn, "Warnings", &blocks);
    }
}

/// Every line of the warnings that are currently queued.
#[cfg(test)]
pub(crate) fn queued_warnings() -> Vec<String> {
    QUEUED_WARNINGS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .iter()
        .flatten()
        .map(|line| line.to_string())
        .collect()
}
