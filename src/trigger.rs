#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriggerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crossing {
    /// Scrolled forward past the band's start edge.
    Enter,
    /// Scrolled backward past the band's end edge.
    EnterBack,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerEvent {
    pub id: TriggerId,
    pub index: usize,
    pub crossing: Crossing,
}

#[derive(Clone, Debug)]
struct Band {
    id: TriggerId,
    index: usize,
    start: f64,
    end: f64,
}

/// Scroll-position triggers over one scroll container. Each trigger is a
/// positional band; events fire only when the observed position crosses a
/// band edge between two updates, so repeated updates inside a band stay
/// silent. Triggers are killed explicitly and report their ids back, which
/// lets an owner prove it released exactly what it created.
#[derive(Debug, Default)]
pub struct TriggerSet {
    next: u64,
    bands: Vec<Band>,
    last_pos: f64,
}

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, index: usize, start: f64, end: f64) -> TriggerId {
        let id = TriggerId(self.next);
        self.next += 1;
        self.bands.push(Band {
            id,
            index,
            start,
            end,
        });
        id
    }

    /// Re-band an existing trigger in place, keeping its id. Used when the
    /// owning container is resized.
    pub fn update_band(&mut self, id: TriggerId, start: f64, end: f64) -> bool {
        match self.bands.iter_mut().find(|b| b.id == id) {
            Some(band) => {
                band.start = start;
                band.end = end;
                true
            }
            None => false,
        }
    }

    pub fn kill(&mut self, id: TriggerId) -> bool {
        let before = self.bands.len();
        self.bands.retain(|b| b.id != id);
        self.bands.len() != before
    }

    /// Kill every trigger, reporting the released ids in creation order.
    pub fn drain(&mut self) -> Vec<TriggerId> {
        self.bands.drain(..).map(|b| b.id).collect()
    }

    pub fn ids(&self) -> Vec<TriggerId> {
        self.bands.iter().map(|b| b.id).collect()
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Report the new scroll position and collect edge crossings since the
    /// previous update.
    pub fn update(&mut self, pos: f64, events: &mut Vec<TriggerEvent>) {
        let last = self.last_pos;
        for band in &self.bands {
            if last < band.start && pos >= band.start {
                events.push(TriggerEvent {
                    id: band.id,
                    index: band.index,
                    crossing: Crossing::Enter,
                });
            } else if last > band.end && pos <= band.end {
                events.push(TriggerEvent {
                    id: band.id,
                    index: band.index,
                    crossing: Crossing::EnterBack,
                });
            }
        }
        self.last_pos = pos;
    }
}
