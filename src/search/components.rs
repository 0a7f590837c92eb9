use crate::{
    constraint::{
        ConstraintId,
        ConstraintStore,
    },
    registry::Variable,
    utils::{
        BoundedArray,
        Index,
    },
};

/// Variables and constraints that share no constraint with the rest of a model.
///
/// Both lists are sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    variables: Vec<Variable>,
    constraints: Vec<ConstraintId>,
}

impl Component {
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[ConstraintId] {
        &self.constraints
    }
}

/// Splits the variables into components connected through common constraints.
///
/// Components are ordered by their first variable. A variable that occurs in
/// no constraint forms a component of its own.
pub fn partition(store: &ConstraintStore, len_variables: usize) -> Vec<Component> {
    let mut visited = BoundedArray::<Variable, bool>::with_len(len_variables, |_| false);
    let mut collected = BoundedArray::<ConstraintId, bool>::with_len(store.len(), |_| false);
    let mut components = Vec::new();
    let mut stack = Vec::new();
    for index in 0..len_variables {
        let root = Variable::from_index(index);
        if visited[root] {
            continue
        }
        visited[root] = true;
        stack.push(root);
        let mut variables = vec![root];
        let mut constraints = Vec::new();
        while let Some(variable) = stack.pop() {
            for &id in store.occurrences(variable) {
                if collected[id] {
                    continue
                }
                collected[id] = true;
                constraints.push(id);
                for &other in store[id].group() {
                    if !visited[other] {
                        visited[other] = true;
                        variables.push(other);
                        stack.push(other);
                    }
                }
            }
        }
        variables.sort_unstable();
        constraints.sort_unstable();
        components.push(Component {
            variables,
            constraints,
        });
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        calendar::{
            Calendar,
            Day,
            Period,
        },
        registry::{
            CourseId,
            LevelId,
            Registry,
            VarKey,
        },
    };

    fn var(index: usize) -> Variable {
        Variable::from_index(index)
    }

    #[test]
    fn disconnected_groups_are_split() {
        let mut registry = Registry::new(Calendar::new(1, 6));
        for period in 1..=6 {
            registry
                .declare(VarKey::new(
                    LevelId::from_index(0),
                    CourseId::from_index(0),
                    Day::new(0),
                    Period::new(period),
                ))
                .unwrap();
        }
        let mut store = ConstraintStore::new();
        let a = store
            .add_exactly_one(&registry, "a", vec![var(0), var(3)])
            .unwrap();
        let b = store
            .add_at_most_one(&registry, "b", vec![var(4), var(1)])
            .unwrap();
        let c = store
            .add_at_most_one(&registry, "c", vec![var(3), var(5)])
            .unwrap();
        let components = partition(&store, registry.len());
        assert_eq!(components.len(), 3);
        assert_eq!(components[0].variables(), [var(0), var(3), var(5)]);
        assert_eq!(components[0].constraints(), [a, c]);
        assert_eq!(components[1].variables(), [var(1), var(4)]);
        assert_eq!(components[1].constraints(), [b]);
        assert_eq!(components[2].variables(), [var(2)]);
        assert!(components[2].constraints().is_empty());
    }

    #[test]
    fn empty_store_has_no_components() {
        assert!(partition(&ConstraintStore::new(), 0).is_empty());
    }
}
