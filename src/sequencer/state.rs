#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SequenceState {
    Idle,      // Waiting for both surfaces to be ready
    ShowingA,  // Logo screen, breathing
    Exploding, // Logo shakes, particle burst
    ShowingB,  // Alternate screen, breathing
    FadingOut, // Alternate screen fading before the restart
}

/// Named visual states toggled on the display surfaces and the stage.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum StateFlag {
    Breathing,
    Shake,
    Exploding,
    Icy,
}
