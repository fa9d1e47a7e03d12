use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Difficulty {
    pub label: &'static str,
    pub cols: usize,
    pub rows: usize,
}

impl Difficulty {
    pub fn piece_count(&self) -> usize {
        self.cols * self.rows
    }
}

pub const DEFAULT_DIFFICULTY: usize = 0;

pub const DIFFICULTIES: &[Difficulty] = &[
    Difficulty {
        label: "3x3",
        cols: 3,
        rows: 3,
    },
    Difficulty {
        label: "4x4",
        cols: 4,
        rows: 4,
    },
    Difficulty {
        label: "5x5",
        cols: 5,
        rows: 5,
    },
    Difficulty {
        label: "7x5",
        cols: 7,
        rows: 5,
    },
    Difficulty {
        label: "8x6",
        cols: 8,
        rows: 6,
    },
];

pub fn difficulty(index: usize) -> Option<&'static Difficulty> {
    DIFFICULTIES.get(index)
}

pub fn difficulty_by_label(label: &str) -> Option<&'static Difficulty> {
    let trimmed = label.trim();
    DIFFICULTIES
        .iter()
        .find(|entry| entry.label.eq_ignore_ascii_case(trimmed))
}

pub fn difficulty_index(cols: usize, rows: usize) -> Option<usize> {
    DIFFICULTIES
        .iter()
        .position(|entry| entry.cols == cols && entry.rows == rows)
}

/// Ordered level names with a current position; stepping past either end wraps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelCursor {
    levels: Vec<String>,
    current: usize,
}

impl LevelCursor {
    pub fn new(levels: Vec<String>) -> Self {
        Self { levels, current: 0 }
    }

    /// Level lists are shipped as whitespace separated names.
    pub fn from_whitespace(list: &str) -> Self {
        Self::new(list.split_whitespace().map(str::to_string).collect())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&str> {
        self.levels.get(self.current).map(String::as_str)
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Returns false and keeps the current level when `index` is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.levels.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> Option<&str> {
        if self.levels.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.levels.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<&str> {
        if self.levels.is_empty() {
            return None;
        }
        self.current = if self.current == 0 {
            self.levels.len() - 1
        } else {
            self.current - 1
        };
        self.current()
    }
}
