//! Batched read queries, one per document level.
//!
//! Each level is read in full and grouped in memory by the mapper, so the
//! query count per sync is fixed regardless of how many events exist.

/// All events.
pub const SELECT_EVENTS: &str = r"
SELECT
    e.id,
    e.name,
    e.description,
    e.category,
    e.ticket_open_time,
    e.running_time
FROM Event e
ORDER BY e.id
";

/// All schedules with their sub-venue and venue, if any.
pub const SELECT_SCHEDULES: &str = r"
SELECT
    es.id,
    es.event_id,
    es.start_time,
    es.end_time,
    sv.id       AS sub_venue_id,
    sv.name     AS sub_venue_name,
    sv.capacity AS capacity,
    v.id        AS venue_id,
    v.name      AS venue_name,
    v.location  AS location
FROM EventSchedule es
LEFT JOIN SubVenue sv ON es.sub_venue_id = sv.id
LEFT JOIN Venue v ON sv.venue_id = v.id
ORDER BY es.event_id, es.id
";

/// All artists.
pub const SELECT_ARTISTS: &str = r"
SELECT
    a.id,
    a.event_schedule_id,
    a.name,
    a.company_name
FROM Artist a
ORDER BY a.event_schedule_id, a.id
";

/// All tickets with holder, schedule, event, and seat section.
pub const SELECT_TICKETS: &str = r#"
SELECT
    t.id,
    t.book_date,
    u.id                     AS user_id,
    u.name                   AS user_name,
    u.email                  AS email,
    es.id                    AS schedule_id,
    e.name                   AS event_name,
    e.category               AS event_category,
    s.class                  AS class,
    CAST(s.price AS REAL)    AS price,
    s.row_number             AS row_number,
    s.column_number          AS column_number
FROM Ticket t
LEFT JOIN "User" u ON t.user_id = u.id
LEFT JOIN EventSchedule es ON t.event_schedule_id = es.id
LEFT JOIN Event e ON es.event_id = e.id
LEFT JOIN SeatSection s ON t.section_id = s.id
ORDER BY t.id
"#;
