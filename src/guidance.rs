//! Workflow guidance shown to agents at each planning phase.

use crate::models::Phase;

const PLANNING: &str = r#"# 🎯 Planning phase

**Focus**: understand the requirements and set goals

**Steps**:
1. **Read the PRD**: analyse the product requirements you were given
2. **Start an iteration**: call `start_new_iteration` with a semantic version
3. **Set goals**: decide what this version must achieve

**Tools**:
- `get_project_context` - see the plan directory and the active iteration
- `start_new_iteration` - open a new development cycle
- `list_iterations` - review earlier versions

**Next**: decompose each goal into requirements
"#;

const DECOMPOSITION: &str = r#"# 🔄 Decomposition phase

**Focus**: break goals down into functional requirements

**Steps**:
1. **Analyse goals**: split each goal into independent capabilities
2. **Describe requirements**: write a clear description for each capability
3. **Check requirements**: each one should be testable and buildable on its own

**Tools**:
- `decompose_goal_into_requirements` - add requirements to a goal
- `view_current_iteration_plan` - review the plan so far

**Guidelines**:
- Requirements are independently implementable
- Descriptions are concrete, not vague
- Core capabilities come first

**Next**: generate tasks for each requirement
"#;

const TASK_GENERATION: &str = r#"# ⚡ Task generation phase

**Focus**: turn requirements into executable tasks

**Steps**:
1. **Split work**: break each requirement into development tasks
2. **Rate complexity**: mark every task low, medium or high
3. **Order tasks**: account for dependencies between tasks

**Tools**:
- `generate_tasks_for_requirement` - add tasks to a requirement
- `update_task_status` - mark tasks done as you finish them
- `view_current_iteration_plan` - review the full plan

**Guidelines**:
- A task fits in one to four hours of work
- Descriptions say exactly what to build
- Include acceptance criteria

**Next**: implement the tasks and keep their status current
"#;

const REPORTING: &str = r#"# 📝 Reporting phase

**Focus**: summarise the work and close the iteration

**Steps**:
1. **Summarise progress**: list the capabilities and tasks that were finished
2. **Record problems**: note issues met along the way and how they were solved
3. **Prepare the release**: write release notes and a changelog

**Tools**:
- `update_development_report` - append to or overwrite the report
- `view_development_report` - read the current report
- `complete_iteration` - close the iteration

**Report contents**:
- Completed capabilities
- Technical difficulties and their solutions
- Known issues and follow-up plans

**Done when**: every task is complete; then call `complete_iteration`
"#;

/// Guidance text for `phase`.
pub fn for_phase(phase: Phase) -> &'static str {
    match phase {
        Phase::Planning => PLANNING,
        Phase::Decomposition => DECOMPOSITION,
        Phase::TaskGeneration => TASK_GENERATION,
        Phase::Reporting => REPORTING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_phase_names_its_tools() {
        assert!(for_phase(Phase::Planning).contains("`start_new_iteration`"));
        assert!(for_phase(Phase::Decomposition).contains("`decompose_goal_into_requirements`"));
        assert!(for_phase(Phase::TaskGeneration).contains("`generate_tasks_for_requirement`"));
        assert!(for_phase(Phase::Reporting).contains("`complete_iteration`"));
    }
}
