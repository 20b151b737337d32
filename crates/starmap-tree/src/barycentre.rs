//! Barycentre linking.

use tracing::debug;

use crate::records::{BarycentreObservation, ParentKind};
use crate::registry::SystemRegistry;
use crate::types::BodyId;

impl SystemRegistry {
    /// Record a barycentre observation and attach it to every body whose
    /// ancestry passes through that barycentre.
    ///
    /// The latest observation for an identifier replaces earlier ones, both
    /// in the registry and in ancestry entries. Bodies ingested later pick
    /// it up from the registry. Returns the number of entries updated.
    pub(crate) fn link_barycentre(&mut self, id: BodyId, observation: BarycentreObservation) -> usize {
        let mut linked = 0;
        for node in &mut self.nodes {
            let Some(detail) = node.detail.as_mut() else {
                continue;
            };
            for link in &mut detail.parents {
                if link.kind == ParentKind::Null && link.body_id == id {
                    link.barycentre = Some(observation.clone());
                    linked += 1;
                }
            }
        }
        debug!(system = %self.address(), barycentre = %id, linked, "barycentre linked");
        self.barycentres.insert(id, observation);
        linked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ParentLink, ScanDetail};
    use crate::types::{NodeKind, SystemAddress};

    fn orbit(eccentricity: f64) -> BarycentreObservation {
        BarycentreObservation {
            eccentricity: Some(eccentricity),
            ..BarycentreObservation::default()
        }
    }

    fn registry_with_parents(parents: Vec<ParentLink>) -> SystemRegistry {
        let mut reg = SystemRegistry::new(SystemAddress(1), "Sol");
        let id = reg.add_node(None, "AB", "Sol AB".into(), NodeKind::Barycentre);
        let planet = reg.add_node(Some(id), "1", "Sol AB 1".into(), NodeKind::PlanetMoonSubstar);
        reg.node_mut(planet).detail = Some(ScanDetail {
            parents,
            ..ScanDetail::default()
        });
        reg
    }

    #[test]
    fn links_only_matching_null_entries() {
        let mut reg = registry_with_parents(vec![
            ParentLink::new(ParentKind::Null, 1),
            ParentLink::new(ParentKind::Star, 1),
            ParentLink::new(ParentKind::Null, 2),
        ]);
        assert_eq!(reg.link_barycentre(BodyId(1), orbit(0.1)), 1);

        let planet = reg.find_by_path(&["AB", "1"]).unwrap();
        let ancestry = planet.ancestry();
        assert!(ancestry[0].barycentre.is_some());
        assert!(ancestry[1].barycentre.is_none());
        assert!(ancestry[2].barycentre.is_none());
    }

    #[test]
    fn latest_observation_wins() {
        let mut reg = registry_with_parents(vec![ParentLink::new(ParentKind::Null, 1)]);
        reg.link_barycentre(BodyId(1), orbit(0.1));
        reg.link_barycentre(BodyId(1), orbit(0.3));

        assert_eq!(reg.barycentre(BodyId(1)).unwrap().eccentricity, Some(0.3));
        let planet = reg.find_by_path(&["AB", "1"]).unwrap();
        assert_eq!(
            planet.ancestry()[0].barycentre.as_ref().unwrap().eccentricity,
            Some(0.3)
        );
    }

    #[test]
    fn unreferenced_barycentre_is_still_recorded() {
        let mut reg = registry_with_parents(Vec::new());
        assert_eq!(reg.link_barycentre(BodyId(9), orbit(0.0)), 0);
        assert!(reg.barycentre(BodyId(9)).is_some());
    }
}
