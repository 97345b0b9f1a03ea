use std::iter;

use hoistpack_common::{DependencyIdx, ModuleIdx};
use oxc_index::IndexVec;
use rustc_hash::{FxHashMap, FxHashSet};

use super::LinkStage;

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
enum Status {
  ToBeExecuted(ModuleIdx, Option<DependencyIdx>),
  WaitForExit(ModuleIdx),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Visit {
  #[default]
  Unvisited,
  Plain,
  Wrapped,
}

impl LinkStage<'_> {
  /// Edges of the bundle's module tree that point back at a module whose execution hasn't
  /// finished yet. Each of them closes an import cycle, reported as a warning.
  pub(crate) fn find_circular_edges(&mut self) -> FxHashSet<DependencyIdx> {
    let mut execution_stack = self
      .bundle()
      .entries
      .iter()
      .rev()
      .map(|entry| Status::ToBeExecuted(*entry, None))
      .collect::<Vec<_>>();

    let mut executed_ids = FxHashSet::default();
    let mut stack_indexes_of_executing_id = FxHashMap::default();
    let mut circular_edges = FxHashSet::default();
    let mut circular_dependencies = FxHashSet::default();

    while let Some(status) = execution_stack.pop() {
      match status {
        Status::ToBeExecuted(id, via) => {
          if executed_ids.contains(&id) {
            if let Some(index) = stack_indexes_of_executing_id.get(&id).copied() {
              circular_edges.extend(via);
              let cycle = execution_stack[index..]
                .iter()
                .filter_map(|status| match status {
                  // Only modules with `Status::WaitForExit` are on the execution chain
                  Status::ToBeExecuted(..) => None,
                  Status::WaitForExit(id) => Some(*id),
                })
                .chain(iter::once(id))
                .collect::<Box<[_]>>();
              circular_dependencies.insert(cycle);
            }
          } else {
            executed_ids.insert(id);
            execution_stack.push(Status::WaitForExit(id));
            stack_indexes_of_executing_id.insert(id, execution_stack.len() - 1);

            let children = self.children_in_bundle(id).collect::<Vec<_>>();
            execution_stack.extend(
              children.into_iter().rev().map(|(dep, target)| Status::ToBeExecuted(target, Some(dep))),
            );
          }
        }
        Status::WaitForExit(id) => {
          stack_indexes_of_executing_id.remove(&id);
        }
      }
    }

    let mut cycles = circular_dependencies.into_iter().collect::<Vec<_>>();
    cycles.sort_unstable();
    for cycle in cycles {
      let paths = cycle
        .iter()
        .map(|id| self.graph.modules[*id].stable_path(&self.options.project_root))
        .collect::<Vec<_>>();
      self.warnings.push(anyhow::anyhow!("Circular dependency: {}.", paths.join(" -> ")));
    }

    circular_edges
  }

  /// Marks every module that has to be emitted as a lazily initialized unit, and records the
  /// modules of the bundle's tree in traversal order.
  ///
  /// An edge wraps its target when it carries the wrap hint, closes a cycle, or lies below an
  /// edge that wraps. A module is visited again when it is reached with a stronger condition, so
  /// a wrapped path always wins over a plain one.
  pub(crate) fn wrap_modules(&mut self, circular_edges: &FxHashSet<DependencyIdx>) {
    let graph = self.graph;
    let bundle = &graph.bundles[self.bundle_idx];
    let mut visited: IndexVec<ModuleIdx, Visit> =
      oxc_index::index_vec![Visit::Unvisited; graph.modules.len()];
    let mut stack = bundle.entries.iter().rev().map(|entry| (*entry, false)).collect::<Vec<_>>();

    while let Some((id, should_wrap)) = stack.pop() {
      let state = if should_wrap { Visit::Wrapped } else { Visit::Plain };
      if visited[id] >= state {
        continue;
      }
      if visited[id] == Visit::Unvisited {
        self.modules.insert(id);
      }
      visited[id] = state;

      let mut next = vec![];
      for dep_idx in &graph.modules[id].dependencies {
        let dep = &graph.dependencies[*dep_idx];
        let wrap = should_wrap || dep.should_wrap() || circular_edges.contains(dep_idx);
        let Some(target) = dep.resolved else {
          continue;
        };
        if wrap && graph.modules[target].has_side_effects() {
          self.wrapped.insert(target);
        }
        if bundle.contains(target) {
          next.push((target, wrap));
        }
      }
      stack.extend(next.into_iter().rev());
    }

    tracing::debug!("{} of {} modules are wrapped", self.wrapped.len(), self.modules.len());
  }
}
