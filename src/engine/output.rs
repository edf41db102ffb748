#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputBlock {
    /// What the acting player did.
    Text(String),
    /// Things that happened around them (monster turns).
    Event(String),
}

#[derive(Default, Debug)]
pub struct Output {
    pub blocks: Vec<OutputBlock>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.trim().is_empty() {
            self.blocks.push(OutputBlock::Text(s));
        }
    }

    pub fn event(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.trim().is_empty() {
            self.blocks.push(OutputBlock::Event(s));
        }
    }

    /// Flatten into one narrative; a blank line separates the player's own
    /// text from the first event.
    pub fn into_narrative(self) -> String {
        let mut narrative = String::new();
        let mut started_events = false;

        for block in self.blocks {
            let line = match block {
                OutputBlock::Text(line) => line,
                OutputBlock::Event(ev) => {
                    if !started_events && !narrative.is_empty() {
                        narrative.push('\n');
                    }
                    started_events = true;
                    ev
                }
            };
            if !narrative.is_empty() {
                narrative.push('\n');
            }
            narrative.push_str(&line);
        }

        narrative
    }
}
