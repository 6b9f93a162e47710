//! Analytics aggregation over order snapshots
//!
//! [`compute`] is a pure function of the current order snapshot plus
//! the viewer's role; it is invoked on every push and recomputes
//! everything in O(orders × items). That is fine at canteen volumes —
//! what matters is the output semantics: bucketing rules, top-N
//! cutoffs, and encounter-order tie-breaks are all normative.
//!
//! Orders are expected newest-first (the feed sorts every snapshot), so
//! "the most recent 7 date buckets" are the first seven distinct dates
//! encountered.

use chrono::Timelike;
use serde::Serialize;

use shared::models::Role;
use shared::{Order, OrderStatus};

/// Top-N cutoff for item popularity
pub const TOP_ITEMS_LIMIT: usize = 5;
/// Top-N cutoff for the customer loyalty ranking
pub const LOYALTY_LIMIT: usize = 3;
/// Number of calendar-date buckets kept for daily series
pub const DAILY_BUCKET_LIMIT: usize = 7;

/// Revenue for one calendar date, labeled "day month" (e.g. "27 Aug")
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DailyRevenuePoint {
    pub date: String,
    pub total: i64,
}

/// Occurrence count for one item name
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ItemCount {
    pub name: String,
    pub count: u32,
}

/// Fixed category dictionary; the order of checks is significant
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Category {
    FastFood,
    Meals,
    Drinks,
    Snacks,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::FastFood,
        Category::Meals,
        Category::Drinks,
        Category::Snacks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::FastFood => "Fast Food",
            Self::Meals => "Meals",
            Self::Drinks => "Drinks",
            Self::Snacks => "Snacks",
        }
    }

    /// Classify an item line by lowercased substring match;
    /// first matching category wins, everything else is Snacks
    pub fn classify(item_name: &str) -> Category {
        const FAST_FOOD: [&str; 5] = ["burger", "pizza", "sandwich", "roll", "momo"];
        const MEALS: [&str; 4] = ["rice", "thali", "paratha", "roti"];
        const DRINKS: [&str; 5] = ["tea", "coffee", "chai", "shake", "milk"];

        let name = item_name.to_lowercase();
        if FAST_FOOD.iter().any(|k| name.contains(k)) {
            Category::FastFood
        } else if MEALS.iter().any(|k| name.contains(k)) {
            Category::Meals
        } else if DRINKS.iter().any(|k| name.contains(k)) {
            Category::Drinks
        } else {
            Category::Snacks
        }
    }
}

/// Item-line count for one category
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategorySlice {
    pub name: &'static str,
    pub count: u32,
}

/// Meal-time buckets — a disjoint partition of hours 0–23
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum MealTime {
    /// Hours 6–10
    Breakfast,
    /// Hours 11–15
    Lunch,
    /// Hours 16–21
    Dinner,
    /// Everything else
    LateNight,
}

impl MealTime {
    pub const ALL: [MealTime; 4] = [
        MealTime::Breakfast,
        MealTime::Lunch,
        MealTime::Dinner,
        MealTime::LateNight,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::LateNight => "Late Night",
        }
    }

    pub fn of_hour(hour: u32) -> MealTime {
        match hour {
            6..=10 => MealTime::Breakfast,
            11..=15 => MealTime::Lunch,
            16..=21 => MealTime::Dinner,
            _ => MealTime::LateNight,
        }
    }
}

/// Order count for one meal-time bucket
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MealTimeSlice {
    pub name: &'static str,
    pub count: u32,
}

/// Spend total for one canteen display name
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CanteenSpend {
    pub name: String,
    pub total: i64,
}

/// Order count for one hour of the day
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HourlyTraffic {
    pub hour: u32,
    /// Conventional 12-hour label ("12 AM", "1 PM", ...)
    pub label: String,
    pub count: u32,
}

/// Spend total for one student, loyalty ranking entry
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoyaltyEntry {
    pub student_name: String,
    pub total: i64,
}

/// Per-date item counts for the stacked daily series
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DailyItemBreakdown {
    pub date: String,
    pub items: Vec<ItemCount>,
}

/// Derived statistics for one snapshot of the order collection
///
/// Role-specific views are `None` when not relevant: category mix and
/// meal times for students, loyalty / wait time / rejections for the
/// shopkeeper.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsBundle {
    pub total_spent: i64,
    pub order_count: usize,
    /// round(total_spent / order_count), 0 when empty
    pub avg_order_value: i64,
    pub daily_revenue: Vec<DailyRevenuePoint>,
    pub item_counts: Vec<ItemCount>,
    pub top_items: Vec<ItemCount>,
    pub canteen_spending: Vec<CanteenSpend>,
    pub hourly_traffic: Vec<HourlyTraffic>,
    pub peak_hour: Option<HourlyTraffic>,
    pub daily_item_breakdown: Vec<DailyItemBreakdown>,
    pub category_mix: Option<Vec<CategorySlice>>,
    pub meal_times: Option<Vec<MealTimeSlice>>,
    pub loyalty: Option<Vec<LoyaltyEntry>>,
    /// Mean minutes from placement to ready, 0 when no order qualifies
    pub avg_wait_minutes: Option<f64>,
    pub rejected_count: Option<usize>,
}

/// Conventional 12-hour label for an hour of day
fn hour_label(hour: u32) -> String {
    let (display, suffix) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };
    format!("{display} {suffix}")
}

fn date_label(order: &Order) -> String {
    order.timestamp.format("%-d %b").to_string()
}

fn bump_count(counts: &mut Vec<ItemCount>, name: &str) {
    if let Some(entry) = counts.iter_mut().find(|c| c.name == name) {
        entry.count += 1;
    } else {
        counts.push(ItemCount {
            name: name.to_string(),
            count: 1,
        });
    }
}

/// Recompute every derived view for one snapshot
///
/// The caller scopes `orders` by role beforehand (all orders for the
/// shopkeeper, the student's own otherwise); `role` only selects which
/// derived views are produced.
pub fn compute(orders: &[Order], role: Role) -> StatsBundle {
    let total_spent: i64 = orders.iter().map(|o| o.total).sum();
    let order_count = orders.len();
    let avg_order_value = if order_count == 0 {
        0
    } else {
        (total_spent as f64 / order_count as f64).round() as i64
    };

    // Daily buckets: first seven distinct dates encountered, in
    // encounter order; older dates fall outside the window
    let mut daily_revenue: Vec<DailyRevenuePoint> = Vec::new();
    let mut daily_item_breakdown: Vec<DailyItemBreakdown> = Vec::new();
    for order in orders {
        let date = date_label(order);
        // Both vectors share the same date set, pushed together
        let bucket = match daily_revenue.iter().position(|p| p.date == date) {
            Some(index) => index,
            None => {
                if daily_revenue.len() >= DAILY_BUCKET_LIMIT {
                    continue;
                }
                daily_revenue.push(DailyRevenuePoint {
                    date: date.clone(),
                    total: 0,
                });
                daily_item_breakdown.push(DailyItemBreakdown {
                    date,
                    items: Vec::new(),
                });
                daily_revenue.len() - 1
            }
        };
        daily_revenue[bucket].total += order.total;
        for item in &order.items {
            bump_count(&mut daily_item_breakdown[bucket].items, &item.name);
        }
    }

    // Item popularity across the whole snapshot
    let mut item_counts: Vec<ItemCount> = Vec::new();
    for order in orders {
        for item in &order.items {
            bump_count(&mut item_counts, &item.name);
        }
    }
    // Stable sort keeps encounter order for ties
    let mut top_items = item_counts.clone();
    top_items.sort_by(|a, b| b.count.cmp(&a.count));
    top_items.truncate(TOP_ITEMS_LIMIT);

    // Spend per canteen display name
    let mut canteen_spending: Vec<CanteenSpend> = Vec::new();
    for order in orders {
        if let Some(entry) = canteen_spending
            .iter_mut()
            .find(|c| c.name == order.canteen_name)
        {
            entry.total += order.total;
        } else {
            canteen_spending.push(CanteenSpend {
                name: order.canteen_name.clone(),
                total: order.total,
            });
        }
    }

    // Orders per hour of day
    let mut hour_counts = [0u32; 24];
    for order in orders {
        hour_counts[order.timestamp.hour() as usize] += 1;
    }
    let hourly_traffic: Vec<HourlyTraffic> = (0..24)
        .filter(|&h| hour_counts[h as usize] > 0)
        .map(|h| HourlyTraffic {
            hour: h,
            label: hour_label(h),
            count: hour_counts[h as usize],
        })
        .collect();
    // Max count; the earliest such hour wins
    let peak_hour = hourly_traffic
        .iter()
        .max_by(|a, b| a.count.cmp(&b.count).then(b.hour.cmp(&a.hour)))
        .cloned();

    // Student-only views
    let (category_mix, meal_times) = if role == Role::Student {
        let mut category_counts = [0u32; 4];
        for order in orders {
            for item in &order.items {
                category_counts[Category::classify(&item.name) as usize] += 1;
            }
        }
        let mix = Category::ALL
            .iter()
            .enumerate()
            .map(|(i, c)| CategorySlice {
                name: c.label(),
                count: category_counts[i],
            })
            .collect();

        let mut meal_counts = [0u32; 4];
        for order in orders {
            meal_counts[MealTime::of_hour(order.timestamp.hour()) as usize] += 1;
        }
        let meals = MealTime::ALL
            .iter()
            .enumerate()
            .map(|(i, m)| MealTimeSlice {
                name: m.label(),
                count: meal_counts[i],
            })
            .collect();

        (Some(mix), Some(meals))
    } else {
        (None, None)
    };

    // Shopkeeper-only views
    let (loyalty, avg_wait_minutes, rejected_count) = if role == Role::Shopkeeper {
        let mut spend: Vec<LoyaltyEntry> = Vec::new();
        for order in orders {
            if let Some(entry) = spend.iter_mut().find(|e| e.student_name == order.student_name) {
                entry.total += order.total;
            } else {
                spend.push(LoyaltyEntry {
                    student_name: order.student_name.clone(),
                    total: order.total,
                });
            }
        }
        spend.sort_by(|a, b| b.total.cmp(&a.total));
        spend.truncate(LOYALTY_LIMIT);

        let waits: Vec<f64> = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Ready)
            .filter_map(|o| o.completed_at.map(|done| (done - o.timestamp)))
            .map(|d| d.num_seconds() as f64 / 60.0)
            .collect();
        let avg_wait = if waits.is_empty() {
            0.0
        } else {
            waits.iter().sum::<f64>() / waits.len() as f64
        };

        let rejected = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Rejected)
            .count();

        (Some(spend), Some(avg_wait), Some(rejected))
    } else {
        (None, None, None)
    };

    StatsBundle {
        total_spent,
        order_count,
        avg_order_value,
        daily_revenue,
        item_counts,
        top_items,
        canteen_spending,
        hourly_traffic,
        peak_hour,
        daily_item_breakdown,
        category_mix,
        meal_times,
        loyalty,
        avg_wait_minutes,
        rejected_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use shared::models::MenuItem;

    fn at(ts: DateTime<Utc>, items: &[(&str, i64)], canteen: &str, student: &str) -> Order {
        let items: Vec<MenuItem> = items.iter().map(|(n, p)| MenuItem::new(*n, *p)).collect();
        let total = items.iter().map(|i| i.price).sum();
        Order {
            id: uuid::Uuid::new_v4().to_string(),
            items,
            total,
            status: OrderStatus::Pending,
            student_id: format!("{student}@campus.edu"),
            student_name: student.to_string(),
            canteen_name: canteen.to_string(),
            note: None,
            token_id: 1000,
            timestamp: ts,
            completed_at: None,
        }
    }

    fn noon(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn classification_dictionary_and_check_order() {
        assert_eq!(Category::classify("Veg Burger"), Category::FastFood);
        assert_eq!(Category::classify("Masala Chai"), Category::Drinks);
        assert_eq!(Category::classify("Veg Thali"), Category::Meals);
        assert_eq!(Category::classify("Samosa"), Category::Snacks);
        // "paneer roll" hits Fast Food before anything else
        assert_eq!(Category::classify("Paneer Roll"), Category::FastFood);
        // first matching check wins: "rice shake" is Meals, not Drinks
        assert_eq!(Category::classify("Rice Shake"), Category::Meals);
    }

    #[test]
    fn meal_time_buckets_partition_the_day() {
        for hour in 0..24 {
            let hits = MealTime::ALL
                .iter()
                .filter(|&&m| MealTime::of_hour(hour) == m)
                .count();
            assert_eq!(hits, 1, "hour {hour} must land in exactly one bucket");
        }
        assert_eq!(MealTime::of_hour(6), MealTime::Breakfast);
        assert_eq!(MealTime::of_hour(10), MealTime::Breakfast);
        assert_eq!(MealTime::of_hour(11), MealTime::Lunch);
        assert_eq!(MealTime::of_hour(15), MealTime::Lunch);
        assert_eq!(MealTime::of_hour(16), MealTime::Dinner);
        assert_eq!(MealTime::of_hour(21), MealTime::Dinner);
        assert_eq!(MealTime::of_hour(22), MealTime::LateNight);
        assert_eq!(MealTime::of_hour(5), MealTime::LateNight);
    }

    #[test]
    fn hour_labels_are_conventional_twelve_hour() {
        assert_eq!(hour_label(0), "12 AM");
        assert_eq!(hour_label(1), "1 AM");
        assert_eq!(hour_label(11), "11 AM");
        assert_eq!(hour_label(12), "12 PM");
        assert_eq!(hour_label(13), "1 PM");
        assert_eq!(hour_label(23), "11 PM");
    }

    #[test]
    fn totals_and_average_agree() {
        let orders = vec![
            at(noon(27), &[("Veg Burger", 60)], "Main Canteen", "asha"),
            at(noon(27), &[("Masala Chai", 15)], "Main Canteen", "ravi"),
            at(noon(26), &[("Veg Thali", 80)], "Annex", "asha"),
        ];
        let stats = compute(&orders, Role::Student);
        assert_eq!(stats.total_spent, 155);
        assert_eq!(stats.order_count, 3);
        assert_eq!(stats.avg_order_value, 52); // round(155 / 3)
    }

    #[test]
    fn empty_snapshot_is_all_zeroes() {
        let stats = compute(&[], Role::Shopkeeper);
        assert_eq!(stats.total_spent, 0);
        assert_eq!(stats.avg_order_value, 0);
        assert!(stats.daily_revenue.is_empty());
        assert!(stats.peak_hour.is_none());
        assert_eq!(stats.avg_wait_minutes, Some(0.0));
        assert_eq!(stats.rejected_count, Some(0));
        assert_eq!(stats.loyalty.as_deref(), Some(&[] as &[LoyaltyEntry]));
    }

    #[test]
    fn daily_buckets_keep_the_seven_most_recent_dates() {
        // Newest-first: days 27 down to 18
        let orders: Vec<Order> = (0..10)
            .map(|i| at(noon(27 - i), &[("Samosa", 10)], "Main Canteen", "asha"))
            .collect();
        let stats = compute(&orders, Role::Student);
        assert_eq!(stats.daily_revenue.len(), DAILY_BUCKET_LIMIT);
        assert_eq!(stats.daily_revenue[0].date, "27 Aug");
        assert_eq!(stats.daily_revenue[6].date, "21 Aug");
        assert_eq!(stats.daily_item_breakdown.len(), DAILY_BUCKET_LIMIT);
        // item_counts still cover all ten orders
        assert_eq!(stats.item_counts[0].count, 10);
    }

    #[test]
    fn same_date_accumulates_into_one_bucket() {
        let orders = vec![
            at(noon(27), &[("Samosa", 10)], "Main Canteen", "asha"),
            at(noon(27), &[("Samosa", 10), ("Masala Chai", 15)], "Main Canteen", "ravi"),
        ];
        let stats = compute(&orders, Role::Student);
        assert_eq!(stats.daily_revenue.len(), 1);
        assert_eq!(stats.daily_revenue[0].total, 35);
        let day = &stats.daily_item_breakdown[0];
        assert_eq!(day.items.len(), 2);
        assert_eq!(day.items[0], ItemCount { name: "Samosa".into(), count: 2 });
    }

    #[test]
    fn top_items_tie_break_is_encounter_order() {
        let orders = vec![at(
            noon(27),
            &[
                ("Samosa", 10),
                ("Masala Chai", 15),
                ("Veg Burger", 60),
                ("Veg Burger", 60),
            ],
            "Main Canteen",
            "asha",
        )];
        let stats = compute(&orders, Role::Student);
        assert_eq!(stats.top_items[0].name, "Veg Burger");
        // Samosa and Masala Chai tie at 1; Samosa was seen first
        assert_eq!(stats.top_items[1].name, "Samosa");
        assert_eq!(stats.top_items[2].name, "Masala Chai");
        let line_total: u32 = stats.item_counts.iter().map(|c| c.count).sum();
        let top_total: u32 = stats.top_items.iter().map(|c| c.count).sum();
        assert!(top_total <= line_total);
    }

    #[test]
    fn peak_hour_prefers_earliest_on_ties() {
        let t = |h| Utc.with_ymd_and_hms(2026, 8, 27, h, 30, 0).unwrap();
        let orders = vec![
            at(t(9), &[("Samosa", 10)], "Main Canteen", "a"),
            at(t(13), &[("Samosa", 10)], "Main Canteen", "b"),
            at(t(13), &[("Samosa", 10)], "Main Canteen", "c"),
            at(t(18), &[("Samosa", 10)], "Main Canteen", "d"),
            at(t(18), &[("Samosa", 10)], "Main Canteen", "e"),
        ];
        let stats = compute(&orders, Role::Shopkeeper);
        assert_eq!(stats.hourly_traffic.len(), 3);
        let peak = stats.peak_hour.unwrap();
        assert_eq!(peak.hour, 13);
        assert_eq!(peak.count, 2);
        assert_eq!(peak.label, "1 PM");
    }

    #[test]
    fn category_mix_partitions_item_lines() {
        let orders = vec![at(
            noon(27),
            &[("Veg Burger", 60), ("Masala Chai", 15), ("Samosa", 10)],
            "Main Canteen",
            "asha",
        )];
        let stats = compute(&orders, Role::Student);
        let mix = stats.category_mix.unwrap();
        let total: u32 = mix.iter().map(|s| s.count).sum();
        assert_eq!(total, 3);
        assert_eq!(mix[0], CategorySlice { name: "Fast Food", count: 1 });
        assert_eq!(mix[2], CategorySlice { name: "Drinks", count: 1 });
        assert_eq!(mix[3], CategorySlice { name: "Snacks", count: 1 });
    }

    #[test]
    fn meal_times_cover_every_order_exactly_once() {
        let t = |h| Utc.with_ymd_and_hms(2026, 8, 27, h, 0, 0).unwrap();
        let orders: Vec<Order> = (0..24)
            .map(|h| at(t(h), &[("Samosa", 10)], "Main Canteen", "asha"))
            .collect();
        let stats = compute(&orders, Role::Student);
        let meals = stats.meal_times.unwrap();
        let total: u32 = meals.iter().map(|s| s.count).sum();
        assert_eq!(total, 24);
        assert_eq!(meals[0], MealTimeSlice { name: "Breakfast", count: 5 });
        assert_eq!(meals[1], MealTimeSlice { name: "Lunch", count: 5 });
        assert_eq!(meals[2], MealTimeSlice { name: "Dinner", count: 6 });
        assert_eq!(meals[3], MealTimeSlice { name: "Late Night", count: 8 });
    }

    #[test]
    fn loyalty_ranks_top_three_by_spend() {
        let orders = vec![
            at(noon(27), &[("Veg Thali", 80)], "Main Canteen", "asha"),
            at(noon(27), &[("Samosa", 10)], "Main Canteen", "ravi"),
            at(noon(26), &[("Veg Thali", 80)], "Main Canteen", "asha"),
            at(noon(26), &[("Veg Burger", 60)], "Main Canteen", "meera"),
            at(noon(25), &[("Masala Chai", 15)], "Main Canteen", "dev"),
        ];
        let stats = compute(&orders, Role::Shopkeeper);
        let loyalty = stats.loyalty.unwrap();
        assert_eq!(loyalty.len(), LOYALTY_LIMIT);
        assert_eq!(loyalty[0].student_name, "asha");
        assert_eq!(loyalty[0].total, 160);
        assert_eq!(loyalty[1].student_name, "meera");
        assert_eq!(loyalty[2].student_name, "dev");
        // student bundles omit the ranking
        assert!(compute(&orders, Role::Student).loyalty.is_none());
    }

    #[test]
    fn wait_time_averages_ready_orders_only() {
        let start = noon(27);
        let mut done_in_10 = at(start, &[("Samosa", 10)], "Main Canteen", "a");
        done_in_10.status = OrderStatus::Ready;
        done_in_10.completed_at = Some(start + Duration::minutes(10));

        let mut done_in_20 = at(start, &[("Samosa", 10)], "Main Canteen", "b");
        done_in_20.status = OrderStatus::Ready;
        done_in_20.completed_at = Some(start + Duration::minutes(20));

        let mut rejected = at(start, &[("Samosa", 10)], "Main Canteen", "c");
        rejected.status = OrderStatus::Rejected;

        let pending = at(start, &[("Samosa", 10)], "Main Canteen", "d");

        let stats = compute(&[done_in_10, done_in_20, rejected, pending], Role::Shopkeeper);
        assert_eq!(stats.avg_wait_minutes, Some(15.0));
        assert_eq!(stats.rejected_count, Some(1));
    }

    #[test]
    fn canteen_spending_groups_by_display_name() {
        let orders = vec![
            at(noon(27), &[("Samosa", 10)], "Main Canteen", "a"),
            at(noon(27), &[("Veg Thali", 80)], "Annex", "a"),
            at(noon(26), &[("Samosa", 10)], "Main Canteen", "a"),
        ];
        let stats = compute(&orders, Role::Student);
        assert_eq!(
            stats.canteen_spending,
            vec![
                CanteenSpend { name: "Main Canteen".into(), total: 20 },
                CanteenSpend { name: "Annex".into(), total: 80 },
            ]
        );
    }

    #[test]
    fn bundle_serializes_for_the_presentation_layer() {
        let orders = vec![at(noon(27), &[("Samosa", 10)], "Main Canteen", "asha")];
        let stats = compute(&orders, Role::Student);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_spent"], 10);
        assert!(json["category_mix"].is_array());
        assert!(json["loyalty"].is_null());
    }
}
