//! Grouping of schedules by sub-route.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::domain::{Schedule, SubRouteId};

/// The group a schedule falls into.
///
/// Schedules with no sub-route get their own variant rather than a
/// sentinel string, so they can never collide with a real sub-route id,
/// whatever that id is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    SubRoute(SubRouteId),
    Unassigned,
}

impl GroupKey {
    /// The group `schedule` belongs to.
    pub fn of(schedule: &Schedule) -> Self {
        match &schedule.sub_route_id {
            Some(id) => GroupKey::SubRoute(id.clone()),
            None => GroupKey::Unassigned,
        }
    }

    pub fn sub_route_id(&self) -> Option<&SubRouteId> {
        match self {
            GroupKey::SubRoute(id) => Some(id),
            GroupKey::Unassigned => None,
        }
    }
}

/// Serializes as the sub-route id, or `null` for unassigned schedules.
impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.sub_route_id().serialize(serializer)
    }
}

/// The schedules of one group, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGroup {
    #[serde(rename = "subRouteId")]
    pub key: GroupKey,
    pub schedules: Vec<Schedule>,
}

/// Schedules partitioned by sub-route.
///
/// Groups appear in the order their first schedule appeared in the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScheduleGroups {
    groups: Vec<ScheduleGroup>,
}

impl ScheduleGroups {
    /// Schedules in the group `key`, if any.
    pub fn get(&self, key: &GroupKey) -> Option<&[Schedule]> {
        self.groups
            .iter()
            .find(|g| &g.key == key)
            .map(|g| g.schedules.as_slice())
    }

    /// Schedules of the given sub-route; empty if it has none.
    pub fn for_sub_route(&self, id: &SubRouteId) -> &[Schedule] {
        self.get(&GroupKey::SubRoute(id.clone())).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduleGroup> {
        self.groups.iter()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl IntoIterator for ScheduleGroups {
    type Item = ScheduleGroup;
    type IntoIter = std::vec::IntoIter<ScheduleGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Partition schedules by sub-route id.
///
/// Every input schedule lands in exactly one group, and schedules keep
/// their relative input order within a group.
pub fn group_by_sub_route(schedules: impl IntoIterator<Item = Schedule>) -> ScheduleGroups {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<ScheduleGroup> = Vec::new();

    for schedule in schedules {
        let key = GroupKey::of(&schedule);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(ScheduleGroup {
                key,
                schedules: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].schedules.push(schedule);
    }

    ScheduleGroups { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, ScheduleId, ScheduleKind, Weekday};

    fn schedule(id: &str, sub_route: Option<&str>) -> Schedule {
        Schedule {
            id: ScheduleId::parse(id).unwrap(),
            route_id: RouteId::parse("R1").unwrap(),
            sub_route_id: sub_route.map(|s| SubRouteId::parse(s).unwrap()),
            sub_route_name: sub_route.map(str::to_string),
            days: [Weekday::Monday].into_iter().collect(),
            departures: vec![],
            kind: ScheduleKind::Normal,
            valid_from: None,
            valid_to: None,
            notes: None,
        }
    }

    fn ids(schedules: &[Schedule]) -> Vec<&str> {
        schedules.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn groups_in_first_appearance_order() {
        let groups = group_by_sub_route(vec![
            schedule("1", Some("out")),
            schedule("2", Some("back")),
            schedule("3", Some("out")),
            schedule("4", None),
            schedule("5", Some("back")),
        ]);

        let keys: Vec<_> = groups.iter().map(|g| g.key.clone()).collect();
        assert_eq!(
            keys,
            vec![
                GroupKey::SubRoute(SubRouteId::parse("out").unwrap()),
                GroupKey::SubRoute(SubRouteId::parse("back").unwrap()),
                GroupKey::Unassigned,
            ]
        );
        assert_eq!(ids(groups.for_sub_route(&SubRouteId::parse("out").unwrap())), vec!["1", "3"]);
        assert_eq!(ids(groups.get(&GroupKey::Unassigned).unwrap()), vec!["4"]);
    }

    #[test]
    fn unassigned_never_collides_with_a_sub_route_named_unassigned() {
        let groups = group_by_sub_route(vec![
            schedule("1", None),
            schedule("2", Some("unassigned")),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(ids(groups.get(&GroupKey::Unassigned).unwrap()), vec!["1"]);
        assert_eq!(
            ids(groups.for_sub_route(&SubRouteId::parse("unassigned").unwrap())),
            vec!["2"]
        );
    }

    #[test]
    fn empty_input() {
        let groups = group_by_sub_route(Vec::new());
        assert!(groups.is_empty());
        assert!(groups.get(&GroupKey::Unassigned).is_none());
        assert!(groups.for_sub_route(&SubRouteId::parse("x").unwrap()).is_empty());
    }

    #[test]
    fn serializes_unassigned_as_null() {
        let groups = group_by_sub_route(vec![schedule("1", None), schedule("2", Some("out"))]);
        let json = serde_json::to_value(&groups).unwrap();
        assert_eq!(json[0]["subRouteId"], serde_json::Value::Null);
        assert_eq!(json[1]["subRouteId"], "out");
        assert_eq!(json[1]["schedules"][0]["id"], "2");
    }
}
