//! Insert, update, remove, and level queries on the aggregate book.

#[cfg(test)]
mod tests {
    use crate::{MarketStats, OrderBook, PlainOrder};

    fn stats() -> MarketStats<i64> {
        MarketStats::new(130, 90, 110, 2000).unwrap()
    }

    fn order(id: u64, volume: i64) -> PlainOrder {
        PlainOrder {
            id,
            volume,
            tick: 0,
        }
    }

    #[test]
    fn empty_book_has_expected_window() {
        let book: OrderBook<PlainOrder> = OrderBook::new(stats());
        // 40 * 1.20 = 48 slots
        assert_eq!(book.size(), 48);
        assert_eq!(book.order_count(), 0);
    }

    #[test]
    fn single_bid_shows_at_its_tick() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_bid(101, order(1, 10));
        assert_eq!(book.bid_volume_at_tick(101), 10);
        assert_eq!(book.ask_volume_at_tick(101), 0);
    }

    #[test]
    fn multiple_bids_rank_from_highest() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_bid(101, order(1, 1));
        book.insert_bid(102, order(2, 2));
        book.insert_bid(103, order(3, 3));
        book.insert_bid(99, order(4, 4));
        book.insert_bid(98, order(5, 5));
        book.insert_bid(97, order(6, 6));

        assert_eq!(book.bid_volume_at_tick(101), 1);
        assert_eq!(book.bid_volume_at_tick(97), 6);

        assert_eq!(book.bid_at_level(0).volume, 3);
        assert_eq!(book.bid_at_level(0).tick, 103);
        assert_eq!(book.bid_at_level(1).volume, 2);
        assert_eq!(book.bid_at_level(2).volume, 1);
        assert_eq!(book.bid_at_level(3).volume, 4);
        assert_eq!(book.bid_at_level(4).volume, 5);
        assert_eq!(book.bid_at_level(5).volume, 6);
        assert_eq!(book.bid_at_level(5).tick, 97);
    }

    #[test]
    fn multiple_asks_rank_from_lowest() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_ask(115, order(1, 1));
        book.insert_ask(116, order(2, 2));
        book.insert_ask(117, order(3, 3));
        book.insert_ask(120, order(4, 4));
        book.insert_ask(121, order(5, 5));
        book.insert_ask(122, order(6, 6));

        assert_eq!(book.ask_at_level(0).volume, 1);
        assert_eq!(book.ask_at_level(0).tick, 115);
        assert_eq!(book.ask_at_level(3).volume, 4);
        assert_eq!(book.ask_at_level(5).volume, 6);
        assert_eq!(book.ask_at_level(5).tick, 122);
    }

    #[test]
    fn level_queries_past_occupancy_return_default_order() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        assert_eq!(book.bid_at_level(0), PlainOrder::default());
        assert_eq!(book.ask_at_level(5), PlainOrder::default());

        book.insert_bid(100, order(1, 10));
        assert_eq!(book.bid_at_level(1).volume, 0);
        assert_eq!(book.bid_at_level(1).tick, 0);
    }

    #[test]
    fn shared_level_accumulates_volume() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_bid(97, order(6, 6));
        book.insert_bid(97, order(7, 4));
        assert_eq!(book.bid_volume_at_tick(97), 10);
    }

    #[test]
    fn update_increases_level_volume() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_bid(97, order(6, 6));
        book.insert_bid(97, order(7, 4));
        book.update_bid(97, order(6, 10));
        assert_eq!(book.bid_volume_at_tick(97), 14);
    }

    #[test]
    fn update_decreases_level_volume() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_ask(122, order(6, 6));
        book.insert_ask(122, order(7, 4));
        book.update_ask(122, order(6, 4));
        assert_eq!(book.ask_volume_at_tick(122), 8);
    }

    #[test]
    fn update_moves_order_between_levels() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_bid(105, order(1, 10));
        book.insert_bid(104, order(2, 15));
        book.update_bid(102, order(2, 15));

        assert_eq!(book.bid_volume_at_tick(104), 0);
        assert_eq!(book.bid_volume_at_tick(102), 15);
        assert_eq!(book.get_order(2).tick, 102);
    }

    #[test]
    fn update_rewrites_stored_volume_and_tick() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_bid(105, order(1, 10));
        book.update_bid(103, order(1, 7));
        let stored = book.get_order(1);
        assert_eq!(stored.volume, 7);
        assert_eq!(stored.tick, 103);
    }

    #[test]
    fn remove_from_single_order_level_zeroes_it() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_bid(105, order(1, 10));
        book.insert_bid(104, order(2, 15));
        book.remove_bid(105, order(1, 10));

        assert_eq!(book.bid_volume_at_tick(105), 0);
        assert_eq!(book.bid_volume_at_tick(104), 15);
        assert_eq!(book.bid_at_level(0).volume, 15);
        assert!(!book.contains_order(1));
    }

    #[test]
    fn remove_from_shared_level_leaves_remainder() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_bid(103, order(3, 20));
        book.insert_bid(103, order(4, 5));
        book.remove_bid(103, order(3, 20));
        assert_eq!(book.bid_volume_at_tick(103), 5);
    }

    #[test]
    fn remove_trusts_stored_tick_over_argument() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_bid(105, order(1, 10));
        // Stale in-range tick argument: the record still comes off 105.
        book.remove_bid(100, order(1, 10));
        assert_eq!(book.bid_volume_at_tick(105), 0);
        assert!(!book.contains_order(1));
    }

    #[test]
    fn insert_normalizes_the_stored_tick() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_bid(
            101,
            PlainOrder {
                id: 1,
                volume: 10,
                tick: 55,
            },
        );
        assert_eq!(book.get_order(1).tick, 101);
    }

    #[test]
    #[should_panic(expected = "duplicate order id")]
    fn duplicate_insert_is_fatal() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_bid(101, order(1, 10));
        book.insert_bid(102, order(1, 5));
    }

    #[test]
    #[should_panic(expected = "order not found")]
    fn update_of_unknown_id_is_fatal() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.update_bid(101, order(1, 10));
    }

    #[test]
    #[should_panic(expected = "order not found")]
    fn remove_of_unknown_id_is_fatal() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.remove_ask(101, order(1, 10));
    }

    #[test]
    #[should_panic(expected = "order not found")]
    fn get_order_of_unknown_id_is_fatal() {
        let book: OrderBook<PlainOrder> = OrderBook::new(stats());
        let _ = book.get_order(42);
    }

    #[test]
    fn sides_are_independent() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_bid(100, order(1, 10));
        book.insert_ask(100, order(2, 20));
        assert_eq!(book.bid_volume_at_tick(100), 10);
        assert_eq!(book.ask_volume_at_tick(100), 20);

        book.remove_bid(100, order(1, 10));
        assert_eq!(book.bid_volume_at_tick(100), 0);
        assert_eq!(book.ask_volume_at_tick(100), 20);
    }

    #[test]
    fn bitmap_counts_track_occupancy() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        assert!(book.bid_bitmap().none());
        assert!(book.ask_bitmap().none());

        book.insert_bid(100, order(1, 10));
        book.insert_bid(99, order(2, 20));
        book.insert_bid(98, order(3, 30));
        assert_eq!(book.bid_bitmap().count(), 3);
        assert!(book.ask_bitmap().none());

        book.update_bid(101, order(1, 10));
        assert_eq!(book.bid_bitmap().count(), 3);

        book.remove_bid(101, order(1, 10));
        assert_eq!(book.bid_bitmap().count(), 2);
    }

    #[test]
    fn clear_restores_fresh_state() {
        let mut book: OrderBook<PlainOrder> = OrderBook::new(stats());
        book.insert_bid(100, order(1, 10));
        book.insert_ask(115, order(2, 20));
        book.clear();

        assert_eq!(book.order_count(), 0);
        assert!(book.bid_bitmap().none());
        assert!(book.ask_bitmap().none());
        assert_eq!(book.best_bid(), i64::MIN);
        assert_eq!(book.best_ask(), i64::MAX);
        assert_eq!(book.bid_volume_at_tick(100), 0);

        // The cleared book accepts the same ids again
        book.insert_bid(100, order(1, 7));
        assert_eq!(book.bid_volume_at_tick(100), 7);
    }

    #[test]
    fn window_sizes_follow_market_stats() {
        let small: OrderBook<PlainOrder> =
            OrderBook::new(MarketStats::new(110, 90, 100, 500).unwrap());
        let large: OrderBook<PlainOrder> =
            OrderBook::new(MarketStats::new(200, 50, 125, 3000).unwrap());
        assert_eq!(small.size(), 21);
        assert_eq!(large.size(), 195);

        assert!(small.low() <= 90 && small.high() >= 110);
        assert!(large.low() <= 50 && large.high() >= 200);
    }
}
