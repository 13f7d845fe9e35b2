//! Hard-coded data every store starts from when nothing is persisted yet.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::models::{
    MemberStatus, Notification, NotificationCategory, NotificationType, Order, OrderStatus,
    Priority, Service, TeamMember,
};

fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .unwrap_or_default()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn member(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    role: &str,
    department: &str,
    status: MemberStatus,
    join_date: NaiveDate,
    assigned_orders: &[&str],
) -> TeamMember {
    TeamMember {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        role: role.to_string(),
        department: department.to_string(),
        status,
        avatar: None,
        join_date,
        last_active: at(2024, 5, 20, 9),
        assigned_orders: assigned_orders.iter().map(|id| id.to_string()).collect(),
    }
}

pub fn team_members() -> Vec<TeamMember> {
    vec![
        member(
            "1",
            "Carlos Martínez",
            "carlos@arreglio.com",
            "+34 600 123 456",
            "technician",
            "Repairs",
            MemberStatus::Active,
            date(2022, 3, 14),
            &["18", "21"],
        ),
        member(
            "2",
            "Lucía Fernández",
            "lucia@arreglio.com",
            "+34 600 654 321",
            "technician",
            "Repairs",
            MemberStatus::Active,
            date(2023, 1, 9),
            &["19"],
        ),
        member(
            "3",
            "Marta Gómez",
            "marta@arreglio.com",
            "+34 611 222 333",
            "manager",
            "Front desk",
            MemberStatus::Active,
            date(2021, 6, 1),
            &[],
        ),
        member(
            "4",
            "Jordi Puig",
            "jordi@arreglio.com",
            "+34 622 444 555",
            "support",
            "Customer care",
            MemberStatus::OnLeave,
            date(2023, 9, 18),
            &[],
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn order(
    id: &str,
    customer_name: &str,
    customer_email: &str,
    device: &str,
    description: &str,
    status: OrderStatus,
    assigned_to: Option<&str>,
    created_at: DateTime<Utc>,
    total: f64,
) -> Order {
    Order {
        id: id.to_string(),
        customer_name: customer_name.to_string(),
        customer_email: customer_email.to_string(),
        customer_phone: "+34 699 000 000".to_string(),
        device: device.to_string(),
        description: description.to_string(),
        status,
        assigned_to: assigned_to.map(str::to_string),
        created_at,
        total,
    }
}

pub fn orders() -> Vec<Order> {
    vec![
        order(
            "18",
            "Ana López",
            "ana.lopez@example.com",
            "iPhone 12",
            "Cracked screen, touch not responding in the lower half",
            OrderStatus::WorkInProgress,
            Some("1"),
            at(2024, 5, 14, 10),
            149.0,
        ),
        order(
            "19",
            "Pere Soler",
            "pere.soler@example.com",
            "Samsung Galaxy S21",
            "Battery drains in a few hours",
            OrderStatus::WaitingForParts,
            Some("2"),
            at(2024, 5, 15, 12),
            79.5,
        ),
        order(
            "20",
            "Elena Ruiz",
            "elena.ruiz@example.com",
            "MacBook Air M1",
            "Liquid damage on keyboard",
            OrderStatus::DropByCustomer,
            None,
            at(2024, 5, 17, 16),
            0.0,
        ),
        order(
            "21",
            "David Vidal",
            "david.vidal@example.com",
            "iPad 9",
            "Charging port loose",
            OrderStatus::Received,
            Some("1"),
            at(2024, 5, 18, 9),
            59.0,
        ),
        order(
            "22",
            "Núria Camps",
            "nuria.camps@example.com",
            "Pixel 7",
            "Back camera out of focus, quote sent",
            OrderStatus::WaitingCustomerReply,
            None,
            at(2024, 5, 19, 11),
            95.0,
        ),
    ]
}

fn service(
    id: &str,
    category: &str,
    service_name: &str,
    description: &str,
    price: f64,
    delivery_price: f64,
) -> Service {
    Service {
        id: id.to_string(),
        category: category.to_string(),
        service_name: service_name.to_string(),
        description: description.to_string(),
        price,
        vat_rate: 21.0,
        delivery_price,
    }
}

pub fn services() -> Vec<Service> {
    vec![
        service(
            "svc-1",
            "Smartphones",
            "Screen replacement",
            "Original-quality display and glass replacement",
            129.0,
            9.9,
        ),
        service(
            "svc-2",
            "Smartphones",
            "Battery replacement",
            "New battery with calibration",
            59.0,
            9.9,
        ),
        service(
            "svc-3",
            "Laptops",
            "Keyboard replacement",
            "Full keyboard swap including backlight",
            149.0,
            14.9,
        ),
        service(
            "svc-4",
            "Laptops",
            "Diagnostics",
            "Hardware and software diagnostic report",
            29.0,
            0.0,
        ),
        service(
            "svc-5",
            "Tablets",
            "Charging port repair",
            "Port cleaning or replacement",
            49.0,
            9.9,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn notification(
    id: &str,
    title: &str,
    message: &str,
    kind: NotificationType,
    category: NotificationCategory,
    timestamp: DateTime<Utc>,
    read: bool,
    priority: Priority,
) -> Notification {
    Notification {
        id: id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        kind,
        category,
        timestamp,
        read,
        priority,
    }
}

/// Mock notifications, timestamped relative to `now`.
pub fn notifications(now: DateTime<Utc>) -> Vec<Notification> {
    vec![
        notification(
            "n1",
            "New order received",
            "Order #22 was created by the front desk",
            NotificationType::Info,
            NotificationCategory::Order,
            now - Duration::minutes(5),
            false,
            Priority::Medium,
        ),
        notification(
            "n2",
            "Parts delayed",
            "The battery for order #19 ships next week",
            NotificationType::Warning,
            NotificationCategory::Order,
            now - Duration::hours(2),
            false,
            Priority::High,
        ),
        notification(
            "n3",
            "Payment confirmed",
            "Order #18 was paid online",
            NotificationType::Success,
            NotificationCategory::Payment,
            now - Duration::hours(6),
            true,
            Priority::Low,
        ),
        notification(
            "n4",
            "Team update",
            "Jordi Puig is on leave until next month",
            NotificationType::Info,
            NotificationCategory::Team,
            now - Duration::days(1),
            false,
            Priority::Low,
        ),
        notification(
            "n5",
            "Backup failed",
            "Nightly export did not finish",
            NotificationType::Error,
            NotificationCategory::System,
            now - Duration::days(2),
            true,
            Priority::High,
        ),
    ]
}
