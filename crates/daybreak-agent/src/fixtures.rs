//! Fixture snapshots served in mock mode and as live-failure fallbacks.
//!
//! These are fixed value objects; only the timestamps are fresh. The view
//! renders them exactly like live data, which keeps the dashboard usable when
//! the agent backend is down.

use chrono::Utc;
use daybreak_core::{
    BriefingData, CalendarData, CalendarDay, CalendarEvent, CommuteDirection, CommuteOptions,
    CommuteOptionsData, DrivingOption, FinancialData, InstrumentQuote, MarketSummary,
    ShuttleDeparture, ShuttleSchedule, ShuttleScheduleData, TodoData, TodoItem, TodoList,
    TrainDeparture, TransitOption, WeatherData, WeatherReport,
};

fn now() -> String {
    Utc::now().to_rfc3339()
}

pub fn mock_weather() -> WeatherData {
    WeatherData {
        tool: "weather".to_string(),
        data: WeatherReport {
            location: "San Francisco".to_string(),
            current_temp: 72.0,
            condition: "Partly Cloudy".to_string(),
            temp_hi: 78.0,
            temp_lo: 65.0,
            precip_chance: 10,
            summary: "Partly cloudy with comfortable temperatures".to_string(),
        },
        timestamp: now(),
    }
}

pub fn mock_financial() -> FinancialData {
    FinancialData {
        tool: "financial".to_string(),
        data: MarketSummary {
            summary: "📊 4 instruments tracked | 📈 3 gaining | 🏆 Best: NVDA (+2.1%)".to_string(),
            total_items: 4,
            market_status: "mixed".to_string(),
            data: vec![
                InstrumentQuote {
                    symbol: "MSFT".to_string(),
                    name: "Microsoft Corporation".to_string(),
                    price: 523.73,
                    change: 6.23,
                    change_percent: 1.2,
                    currency: "USD".to_string(),
                    data_type: "stocks".to_string(),
                },
                InstrumentQuote {
                    symbol: "BTC".to_string(),
                    name: "Bitcoin".to_string(),
                    price: 96847.0,
                    change: -2284.0,
                    change_percent: -2.3,
                    currency: "USD".to_string(),
                    data_type: "crypto".to_string(),
                },
                InstrumentQuote {
                    symbol: "ETH".to_string(),
                    name: "Ethereum".to_string(),
                    price: 2847.0,
                    change: 42.0,
                    change_percent: 1.5,
                    currency: "USD".to_string(),
                    data_type: "crypto".to_string(),
                },
                InstrumentQuote {
                    symbol: "NVDA".to_string(),
                    name: "NVIDIA Corporation".to_string(),
                    price: 875.12,
                    change: 18.2,
                    change_percent: 2.1,
                    currency: "USD".to_string(),
                    data_type: "stocks".to_string(),
                },
            ],
        },
        timestamp: now(),
    }
}

pub fn mock_calendar() -> CalendarData {
    CalendarData {
        tool: "calendar".to_string(),
        data: CalendarDay {
            events: vec![
                CalendarEvent {
                    title: "Team Standup".to_string(),
                    time: "9:00 AM".to_string(),
                    color: "blue".to_string(),
                },
                CalendarEvent {
                    title: "Code Review".to_string(),
                    time: "2:00 PM".to_string(),
                    color: "green".to_string(),
                },
                CalendarEvent {
                    title: "Gym Session".to_string(),
                    time: "6:00 PM".to_string(),
                    color: "orange".to_string(),
                },
            ],
            total_events: 3,
        },
        timestamp: now(),
    }
}

pub fn mock_todos() -> TodoData {
    let items = vec![
        TodoItem {
            id: "1".to_string(),
            text: "Review quarterly reports".to_string(),
            completed: false,
            priority: "high".to_string(),
        },
        TodoItem {
            id: "2".to_string(),
            text: "Update project timeline".to_string(),
            completed: false,
            priority: "medium".to_string(),
        },
        TodoItem {
            id: "3".to_string(),
            text: "Call insurance company".to_string(),
            completed: false,
            priority: "low".to_string(),
        },
        TodoItem {
            id: "4".to_string(),
            text: "Book dentist appointment".to_string(),
            completed: false,
            priority: "low".to_string(),
        },
    ];
    let total_pending = items.iter().filter(|i| !i.completed).count() as u32;
    TodoData {
        tool: "todos".to_string(),
        data: TodoList {
            items,
            total_pending,
        },
        timestamp: now(),
    }
}

pub fn mock_commute_options(direction: CommuteDirection) -> CommuteOptionsData {
    let recommendation = match direction {
        CommuteDirection::ToWork => {
            "Traffic is building on US-101; the train gets you in five minutes earlier."
        }
        CommuteDirection::FromWork => {
            "Driving is clear right now; leaving within 20 minutes beats the evening rush."
        }
    };
    CommuteOptionsData {
        tool: "commute".to_string(),
        data: CommuteOptions {
            recommendation: Some(recommendation.to_string()),
            driving: Some(DrivingOption {
                duration_minutes: 38,
                distance_miles: 28.4,
                estimated_fuel_gallons: 1.1,
                route_summary: "US-101 S".to_string(),
                traffic_status: "Moderate Traffic".to_string(),
                departure_time: "8:10 AM".to_string(),
                arrival_time: "8:48 AM".to_string(),
            }),
            transit: Some(TransitOption {
                total_duration_minutes: 52,
                caltrain_duration_minutes: 33,
                shuttle_duration_minutes: 10,
                walking_duration_minutes: 5,
                transfer_time_minutes: 4,
                next_departures: vec![
                    TrainDeparture {
                        train_number: "507".to_string(),
                        departure_time: "8:14 AM".to_string(),
                        arrival_time: "8:47 AM".to_string(),
                        delay_minutes: 0,
                    },
                    TrainDeparture {
                        train_number: "511".to_string(),
                        departure_time: "8:34 AM".to_string(),
                        arrival_time: "9:07 AM".to_string(),
                        delay_minutes: 3,
                    },
                ],
            }),
        },
        timestamp: now(),
    }
}

pub fn mock_shuttle_schedule() -> ShuttleScheduleData {
    ShuttleScheduleData {
        tool: "shuttle".to_string(),
        data: ShuttleSchedule {
            duration_minutes: 10,
            frequency_minutes: 15,
            service_hours: "6:30 AM - 10:30 AM, 3:30 PM - 7:30 PM".to_string(),
            next_departures: vec![
                ShuttleDeparture {
                    departure_time: "8:15 AM".to_string(),
                },
                ShuttleDeparture {
                    departure_time: "8:30 AM".to_string(),
                },
                ShuttleDeparture {
                    departure_time: "8:45 AM".to_string(),
                },
            ],
        },
        timestamp: now(),
    }
}

pub fn mock_briefing() -> BriefingData {
    BriefingData {
        briefing: "Good morning! Here's your daily overview: Weather is pleasant at 72°F. \
                   Markets are mixed with NVDA leading gains. You have 3 meetings today and \
                   4 pending tasks."
            .to_string(),
        timestamp: now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn financial_fixture_counts_match_its_instruments() {
        let fixture = mock_financial();
        assert_eq!(fixture.data.total_items as usize, fixture.data.data.len());
    }

    #[test]
    fn todo_fixture_pending_count_matches_items() {
        let fixture = mock_todos();
        let pending = fixture.data.items.iter().filter(|i| !i.completed).count();
        assert_eq!(fixture.data.total_pending as usize, pending);
    }

    #[test]
    fn commute_fixture_recommendation_follows_direction() {
        let morning = mock_commute_options(CommuteDirection::ToWork);
        let evening = mock_commute_options(CommuteDirection::FromWork);
        assert_ne!(morning.data.recommendation, evening.data.recommendation);
    }
}
