//! Draw / hand / discard bookkeeping for the player's deck.

use crate::config::CombatConfig;
use crate::env::{Dice, RngOracle};

/// The three card piles of an encounter.
///
/// The draw pile is consumed from the back. When it runs dry mid-draw, the
/// discard pile is shuffled into it and drawing continues.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeckPiles<C> {
    draw: Vec<C>,
    hand: Vec<C>,
    discard: Vec<C>,
}

impl<C> Default for DeckPiles<C> {
    fn default() -> Self {
        Self {
            draw: Vec::new(),
            hand: Vec::new(),
            discard: Vec::new(),
        }
    }
}

/// Result of a draw request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawReport {
    pub drawn: usize,
    pub reshuffled: bool,
}

impl<C> DeckPiles<C> {
    /// Builds piles from a deck list; the whole deck starts in the draw pile,
    /// shuffled.
    pub fn new<R: RngOracle>(deck: Vec<C>, dice: &mut Dice<R>) -> Self {
        let mut piles = Self {
            draw: deck,
            hand: Vec::new(),
            discard: Vec::new(),
        };
        shuffle(&mut piles.draw, dice);
        piles
    }

    /// Builds piles without shuffling. The last card is drawn first.
    pub fn stacked(deck: Vec<C>) -> Self {
        Self {
            draw: deck,
            ..Self::default()
        }
    }

    /// Draws up to `count` cards, reshuffling the discard pile when the draw
    /// pile empties. Stops early when both piles are empty or the hand is full.
    pub fn draw<R: RngOracle>(&mut self, count: usize, dice: &mut Dice<R>) -> DrawReport {
        let mut report = DrawReport::default();

        for _ in 0..count {
            if self.hand.len() >= CombatConfig::MAX_HAND_SIZE {
                break;
            }
            if self.draw.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.draw.append(&mut self.discard);
                shuffle(&mut self.draw, dice);
                report.reshuffled = true;
            }
            if let Some(card) = self.draw.pop() {
                self.hand.push(card);
                report.drawn += 1;
            }
        }

        report
    }

    /// Moves the card at `index` from hand to discard and returns a reference
    /// to it in its new place.
    pub fn discard(&mut self, index: usize) -> Option<&C> {
        if index >= self.hand.len() {
            return None;
        }
        let card = self.hand.remove(index);
        self.discard.push(card);
        self.discard.last()
    }

    /// Moves the whole hand to the discard pile.
    pub fn discard_hand(&mut self) -> usize {
        let count = self.hand.len();
        self.discard.append(&mut self.hand);
        count
    }

    pub fn hand(&self) -> &[C] {
        &self.hand
    }

    pub fn draw_pile_len(&self) -> usize {
        self.draw.len()
    }

    pub fn discard_pile_len(&self) -> usize {
        self.discard.len()
    }

    /// Total cards across all piles.
    pub fn len(&self) -> usize {
        self.draw.len() + self.hand.len() + self.discard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fisher–Yates using the encounter's roll source.
fn shuffle<C, R: RngOracle>(cards: &mut [C], dice: &mut Dice<R>) {
    for i in (1..cards.len()).rev() {
        let j = dice.shuffle_index(i + 1);
        cards.swap(i, j);
    }
}
