//! Prompt template for the Vastu oracle

use crate::core::heading::Heading;

/// Placeholder substituted with the whole-degree heading
pub const DIRECTION_PLACEHOLDER: &str = "{{direction}}";

/// Prompt sent for every settled heading
pub const VASTU_PROMPT_TEMPLATE: &str = "You are an expert in Vastu Shastra. Provide information and predictions based on Vastu Shastra principles for the following compass direction: {{direction}} degrees.

Consider these directions as:
North: Represents wealth and career.
East: Represents social connections and overall well-being.
South: Represents strength and fame.
West: Represents peace and prosperity.
Northeast: Represents spiritual growth and knowledge.
Southeast: Represents passion and creativity.
Southwest: Represents skills and stability.
Northwest: Represents support and change.

Give vastu shastra information in brief.
";

/// Render the prompt for `direction`
pub fn render_prompt(direction: Heading) -> String {
    VASTU_PROMPT_TEMPLATE.replace(DIRECTION_PLACEHOLDER, &direction.rounded().to_string())
}
