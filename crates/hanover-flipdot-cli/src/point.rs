//! Pixel coordinates given on the command line.

use std::str::FromStr;

/// A pixel coordinate written as `x,y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl FromStr for Point {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("Expected x,y but got '{}'", s))?;
        let x = x
            .trim()
            .parse()
            .map_err(|_| format!("Invalid x coordinate: '{}'", x))?;
        let y = y
            .trim()
            .parse()
            .map_err(|_| format!("Invalid y coordinate: '{}'", y))?;
        Ok(Point { x, y })
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}
