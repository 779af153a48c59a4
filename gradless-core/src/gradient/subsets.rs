use std::collections::HashSet;
use std::hash::Hash;

use crate::error::GradlessError;

/// Assigns every parameter index to a perturbation subset.
///
/// The distinct labels define the groups that the SPSA estimator perturbs
/// one at a time, holding the other parameters fixed. Groups are visited in
/// the order in which their label first appears.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetAssignment<L = usize> {
    labels: Vec<L>,
    subsets: Vec<L>,
}

impl<L> SubsetAssignment<L>
where
    L: Eq + Hash + Clone,
{
    /// Creates an assignment from one label per parameter.
    ///
    /// # Errors
    ///
    /// Returns `GradlessError::ConfigurationError` if `labels` is empty.
    pub fn new(labels: Vec<L>) -> Result<Self, GradlessError> {
        if labels.is_empty() {
            return Err(GradlessError::ConfigurationError(
                "Subset assignment must label at least one parameter".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        let subsets = labels
            .iter()
            .filter(|label| seen.insert((*label).clone()))
            .cloned()
            .collect();
        Ok(SubsetAssignment { labels, subsets })
    }

    /// Number of parameters covered by the assignment.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label of every parameter, by index.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Distinct labels in first-appearance order.
    pub fn subsets(&self) -> &[L] {
        &self.subsets
    }

    /// Membership mask of `subset`: `true` where the parameter belongs to it.
    pub fn mask(&self, subset: &L) -> Vec<bool> {
        self.labels.iter().map(|label| label == subset).collect()
    }

    /// One membership mask per subset, in visiting order.
    pub fn masks(&self) -> Vec<Vec<bool>> {
        self.subsets.iter().map(|subset| self.mask(subset)).collect()
    }

    pub(crate) fn check_len(&self, n_params: usize) -> Result<(), GradlessError> {
        if self.labels.len() != n_params {
            return Err(GradlessError::ShapeMismatch {
                expected: self.labels.len(),
                actual: n_params,
                operation: "SubsetAssignment vs parameter vector".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsets_keep_first_appearance_order() {
        let assignment = SubsetAssignment::new(vec!["b", "a", "b", "c", "a"]).unwrap();
        assert_eq!(assignment.subsets(), &["b", "a", "c"]);
        assert_eq!(assignment.len(), 5);
    }

    #[test]
    fn test_masks_partition_indices() {
        let assignment = SubsetAssignment::new(vec![0, 1, 0, 1]).unwrap();
        let masks = assignment.masks();
        assert_eq!(masks, vec![vec![true, false, true, false], vec![false, true, false, true]]);
        for i in 0..assignment.len() {
            assert_eq!(masks.iter().filter(|m| m[i]).count(), 1);
        }
    }

    #[test]
    fn test_empty_assignment_rejected() {
        let result = SubsetAssignment::<usize>::new(vec![]);
        assert!(matches!(result, Err(GradlessError::ConfigurationError(_))));
    }

    #[test]
    fn test_check_len_mismatch() {
        let assignment = SubsetAssignment::new(vec![0, 0, 1]).unwrap();
        assert!(assignment.check_len(3).is_ok());
        assert!(matches!(
            assignment.check_len(4),
            Err(GradlessError::ShapeMismatch { expected: 3, actual: 4, .. })
        ));
    }
}
