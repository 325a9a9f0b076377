//! Deck integration tests: epidemic chunk placement and discard re-adding.

use pandemic_search::core::card::PlayerCard;
use pandemic_search::core::map::CityId;
use pandemic_search::core::GameRng;
use pandemic_search::decks::{DeckEnd, InfectDeck, PlayerDeck};
use rustc_hash::FxHashSet;

fn shuffled_deck(difficulty: u8, dealt: usize, rng: &mut GameRng) -> PlayerDeck {
    let mut deck = PlayerDeck::new(difficulty);
    for _ in 0..dealt {
        deck.deal(rng).unwrap();
    }
    deck.setup_shuffle();
    deck
}

// =============================================================================
// Player deck
// =============================================================================

#[test]
fn test_every_epidemic_lands_in_its_chunk() {
    for difficulty in 1..=6u8 {
        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            let mut deck = shuffled_deck(difficulty, 9, &mut rng);
            let chunks: Vec<_> = (0..usize::from(difficulty)).map(|c| deck.chunk_bounds(c)).collect();

            let mut epidemics = Vec::new();
            let mut position = 0;
            while !deck.is_empty() {
                let before = deck.remaining_cards();
                let card = deck.draw(&mut rng).unwrap();
                assert_eq!(deck.remaining_cards(), before - 1);
                if let PlayerCard::Epidemic(n) = card {
                    epidemics.push((n, position));
                }
                position += 1;
            }

            assert_eq!(epidemics.len(), usize::from(difficulty));
            for (n, pos) in epidemics {
                assert!(chunks[usize::from(n)].contains(&pos), "difficulty {difficulty} seed {seed}");
            }
            assert_eq!(deck.remaining_cards(), 0);
            assert!(deck.draw(&mut rng).is_err());
        }
    }
}

#[test]
fn test_chunks_cover_the_deck() {
    let mut rng = GameRng::new(1);
    let deck = shuffled_deck(5, 8, &mut rng);
    let total = deck.remaining_cards();
    let mut covered = 0;
    for chunk in 0..5 {
        let bounds = deck.chunk_bounds(chunk);
        assert_eq!(bounds.start, covered);
        covered = bounds.end;
    }
    assert_eq!(covered, total);
}

#[test]
fn test_peek_does_not_change_deck() {
    let mut rng = GameRng::new(2);
    let deck = shuffled_deck(4, 9, &mut rng);
    let copy = deck.clone();
    for _ in 0..10 {
        let card = deck.peek(&mut rng).unwrap();
        assert!(deck.contains(card));
    }
    assert_eq!(deck, copy);
}

// =============================================================================
// Infection deck
// =============================================================================

#[test]
fn test_discard_readd_round_trip() {
    let mut rng = GameRng::new(3);
    let mut deck = InfectDeck::new();

    let first: Vec<CityId> = (0..12).map(|_| deck.draw(DeckEnd::Top, &mut rng).unwrap()).collect();
    deck.readd_discard();
    assert!(deck.discard().is_empty());
    assert_eq!(deck.len(), 48);

    let second: Vec<CityId> = (0..12).map(|_| deck.draw(DeckEnd::Top, &mut rng).unwrap()).collect();
    let a: FxHashSet<_> = first.into_iter().collect();
    let b: FxHashSet<_> = second.into_iter().collect();
    assert_eq!(a, b);
}

#[test]
fn test_drawing_everything_then_readding() {
    let mut rng = GameRng::new(4);
    let mut deck = InfectDeck::new();
    let all: FxHashSet<_> = (0..48).map(|_| deck.draw(DeckEnd::Top, &mut rng).unwrap()).collect();
    assert_eq!(all.len(), 48);
    assert!(deck.is_empty());
    assert!(deck.draw(DeckEnd::Top, &mut rng).is_err());

    deck.readd_discard();
    let again: FxHashSet<_> = (0..48).map(|_| deck.draw(DeckEnd::Top, &mut rng).unwrap()).collect();
    assert_eq!(all, again);
}

#[test]
fn test_bottom_draw_comes_from_oldest_chunk() {
    let mut rng = GameRng::new(5);
    let mut deck = InfectDeck::new();
    let drawn: FxHashSet<_> = (0..6).map(|_| deck.draw(DeckEnd::Top, &mut rng).unwrap()).collect();
    deck.readd_discard();
    assert_eq!(deck.chunk_count(), 2);

    let bottom = deck.draw(DeckEnd::Bottom, &mut rng).unwrap();
    assert!(!drawn.contains(&bottom));
    assert_eq!(deck.chunk_len(DeckEnd::Top), 6);
}

#[test]
fn test_readd_empty_discard_is_noop() {
    let mut deck = InfectDeck::new();
    deck.readd_discard();
    assert_eq!(deck.chunk_count(), 1);
    assert_eq!(deck, InfectDeck::new());
}
