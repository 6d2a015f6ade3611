//! Bundled sample puzzle and its solution.

/// A 6×7 map: start facing right, three gems, two portal pairs.
pub const SAMPLE_MAP: &str = "止\t止\t止\t→\t\t\t♦
止\t止\t止\t止\t止\t止\tW1
止\t止\t止\t止\t止\tW1\t止
\t止\t止\t止\t止\t\t止
♦\t\t\tW2\t止\t\t止
止\t止\t止\t止\tW2\t♦\t止";

/// Sixteen commands that collect every gem on [`SAMPLE_MAP`].
pub const SAMPLE_SOLUTION: &str = "moveForward()
moveForward()
moveForward()
collectGem()
turnRight()
moveForward()
moveForward()
moveForward()
moveForward()
collectGem()
turnRight()
moveForward()
moveForward()
moveForward()
moveForward()
collectGem()";
