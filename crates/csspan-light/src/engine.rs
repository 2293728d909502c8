//! lightningcss visitor adapter
//!
//! Turns lightningcss visitor callbacks into builder events. Rules carry
//! the engine's own location; declarations and function-like values get
//! a scanned location when enabled; everything else inherits.

use lightningcss::declaration::DeclarationBlock;
use lightningcss::printer::PrinterOptions;
use lightningcss::properties::Property;
use lightningcss::properties::custom::{EnvironmentVariable, Function, TokenOrValue, Variable};
use lightningcss::media_query::MediaQuery;
use lightningcss::rules::{CssRule, Location};
use lightningcss::rules::supports::SupportsCondition;
use lightningcss::selector::{Component, Selector};
use lightningcss::traits::ToCss;
use lightningcss::values::angle::Angle;
use lightningcss::values::color::CssColor;
use lightningcss::values::ident::{CustomIdent, DashedIdent};
use lightningcss::values::image::Image;
use lightningcss::values::ratio::Ratio;
use lightningcss::values::resolution::Resolution;
use lightningcss::values::time::Time;
use lightningcss::values::url::Url;
use lightningcss::visitor::{Visit, VisitTypes, Visitor};

use csspan_text::LineColumn;

use crate::hints::{HintScanner, Signature};
use crate::{LightError, LocationOrigin, NodeData, NodeKind, TreeBuilder};

/// Visitor feeding a [`TreeBuilder`]
pub(crate) struct EngineVisitor<'b> {
    builder: &'b mut TreeBuilder,
    hints: HintScanner,
    scan: bool,
}

impl<'b> EngineVisitor<'b> {
    pub fn new(builder: &'b mut TreeBuilder, scan: bool) -> Self {
        Self {
            builder,
            hints: HintScanner::default(),
            scan,
        }
    }

    /// Engine locations count lines from 0 and columns from 1 in UTF-16 units
    fn engine_position(&self, loc: &Location) -> Option<LineColumn> {
        let column = self
            .builder
            .source()
            .utf16_to_byte_column(loc.line, loc.column.saturating_sub(1))
            .ok()?;
        Some(LineColumn::new(loc.line, column))
    }

    fn scanned(&mut self, data: NodeData, signature: Signature<'_>) -> NodeData {
        if !self.scan {
            return data;
        }
        let source = self.builder.source();
        match self
            .hints
            .find(source.text(), signature)
            .and_then(|offset| source.position_of(offset).ok())
        {
            Some(position) => data.with_location(position, LocationOrigin::Scanned),
            None => data,
        }
    }

    fn leaf(&mut self, kind: NodeKind, data: NodeData) -> Result<(), LightError> {
        self.builder.leaf(kind, data)?;
        Ok(())
    }
}

impl<'i> Visitor<'i> for EngineVisitor<'_> {
    type Error = LightError;

    fn visit_types(&self) -> VisitTypes {
        VisitTypes::all()
    }

    fn visit_rule(&mut self, rule: &mut CssRule<'i>) -> Result<(), Self::Error> {
        // Declarations that follow a nested rule still belong to the
        // enclosing rule's block
        if let CssRule::NestedDeclarations(nested) = rule {
            return self.visit_declaration_block(&mut nested.declarations);
        }

        let position = rule_location(rule).and_then(|loc| self.engine_position(&loc));
        let mut data = NodeData::new(rule_type(rule));

        let source = self.builder.source();
        match position.and_then(|position| source.offset_at(position).ok()) {
            Some(start) => self.hints.open_block(source.text(), start),
            None => self.hints.inherit_block(source.text()),
        }
        if let Some(position) = position {
            data = data.with_location(position, LocationOrigin::Engine);
        }

        self.builder.enter(NodeKind::Rule, data)?;
        rule.visit_children(self)?;
        self.builder.exit(NodeKind::Rule)?;
        self.hints.close_block();
        Ok(())
    }

    fn visit_declaration_block(&mut self, block: &mut DeclarationBlock<'i>) -> Result<(), Self::Error> {
        if !self.scan || block.important_declarations.is_empty() {
            return block.visit_children(self);
        }

        // The engine lists `!important` declarations first; visit in source order
        let normal = property_names(&block.declarations);
        let important = property_names(&block.important_declarations);
        let order = {
            let normal: Vec<&str> = normal.iter().map(String::as_str).collect();
            let important: Vec<&str> = important.iter().map(String::as_str).collect();
            self.hints
                .source_order(self.builder.source().text(), &normal, &important)
        };

        for (is_important, index) in order {
            let list = if is_important {
                &mut block.important_declarations
            } else {
                &mut block.declarations
            };
            if let Some(property) = list.get_mut(index) {
                self.visit_property(property)?;
            }
        }
        Ok(())
    }

    fn visit_property(&mut self, property: &mut Property<'i>) -> Result<(), Self::Error> {
        let id = property.property_id();
        let name = id.name().to_string();
        let data = self.scanned(NodeData::new(name.as_str()), Signature::Property(&name));

        self.builder.enter(NodeKind::Declaration, data)?;
        property.visit_children(self)?;
        self.builder.exit(NodeKind::Declaration)?;
        Ok(())
    }

    fn visit_function(&mut self, function: &mut Function<'i>) -> Result<(), Self::Error> {
        let name = (*function.name.0).to_string();
        let data = NodeData::new(name.as_str()).with_detail(Some(function.arguments.0.len().to_string()));
        let data = self.scanned(data, Signature::Call(&name));

        self.builder.enter(NodeKind::Function, data)?;
        function.visit_children(self)?;
        self.builder.exit(NodeKind::Function)?;
        Ok(())
    }

    fn visit_variable(&mut self, var: &mut Variable<'i>) -> Result<(), Self::Error> {
        let data = NodeData::new(&*var.name.ident.0);
        let data = self.scanned(data, Signature::Call("var"));

        self.builder.enter(NodeKind::Variable, data)?;
        var.visit_children(self)?;
        self.builder.exit(NodeKind::Variable)?;
        Ok(())
    }

    fn visit_environment_variable(&mut self, env: &mut EnvironmentVariable<'i>) -> Result<(), Self::Error> {
        let data = NodeData::new(variant_name(&env.name));
        let data = self.scanned(data, Signature::Call("env"));

        self.builder.enter(NodeKind::EnvironmentVariable, data)?;
        env.visit_children(self)?;
        self.builder.exit(NodeKind::EnvironmentVariable)?;
        Ok(())
    }

    fn visit_media_query(&mut self, query: &mut MediaQuery<'i>) -> Result<(), Self::Error> {
        let data = NodeData::new(variant_name(&query.media_type)).with_detail(css_text(query));

        self.builder.enter(NodeKind::MediaQuery, data)?;
        query.visit_children(self)?;
        self.builder.exit(NodeKind::MediaQuery)?;
        Ok(())
    }

    fn visit_supports_condition(&mut self, condition: &mut SupportsCondition<'i>) -> Result<(), Self::Error> {
        let data = NodeData::new(variant_name(condition)).with_detail(css_text(condition));

        self.builder.enter(NodeKind::SupportsCondition, data)?;
        condition.visit_children(self)?;
        self.builder.exit(NodeKind::SupportsCondition)?;
        Ok(())
    }

    fn visit_image(&mut self, image: &mut Image<'i>) -> Result<(), Self::Error> {
        let data = NodeData::new(image_type(image)).with_detail(css_text(image));

        self.builder.enter(NodeKind::Image, data)?;
        image.visit_children(self)?;
        self.builder.exit(NodeKind::Image)?;
        Ok(())
    }

    fn visit_selector(&mut self, selector: &mut Selector<'i>) -> Result<(), Self::Error> {
        let data = NodeData::new(selector_components(selector)).with_detail(Some(format!("{:?}", selector)));
        self.leaf(NodeKind::Selector, data)
    }

    fn visit_color(&mut self, color: &mut CssColor) -> Result<(), Self::Error> {
        let data = NodeData::new(variant_name(color)).with_detail(css_text(color));
        self.leaf(NodeKind::Color, data)
    }

    fn visit_url(&mut self, url: &mut Url<'i>) -> Result<(), Self::Error> {
        let data = NodeData::new("url").with_detail(Some((*url.url).to_string()));
        let data = self.scanned(data, Signature::Call("url"));
        self.leaf(NodeKind::Url, data)
    }

    fn visit_angle(&mut self, angle: &mut Angle) -> Result<(), Self::Error> {
        let data = NodeData::new(variant_name(angle)).with_detail(css_text(angle));
        self.leaf(NodeKind::Angle, data)
    }

    fn visit_ratio(&mut self, ratio: &mut Ratio) -> Result<(), Self::Error> {
        let data = NodeData::new("ratio").with_detail(css_text(ratio));
        self.leaf(NodeKind::Ratio, data)
    }

    fn visit_resolution(&mut self, resolution: &mut Resolution) -> Result<(), Self::Error> {
        let data = NodeData::new(variant_name(resolution)).with_detail(css_text(resolution));
        self.leaf(NodeKind::Resolution, data)
    }

    fn visit_time(&mut self, time: &mut Time) -> Result<(), Self::Error> {
        let data = NodeData::new(variant_name(time)).with_detail(css_text(time));
        self.leaf(NodeKind::Time, data)
    }

    fn visit_custom_ident(&mut self, ident: &mut CustomIdent) -> Result<(), Self::Error> {
        self.leaf(NodeKind::CustomIdent, NodeData::new(&*ident.0))
    }

    fn visit_dashed_ident(&mut self, ident: &mut DashedIdent) -> Result<(), Self::Error> {
        self.leaf(NodeKind::DashedIdent, NodeData::new(&*ident.0))
    }

    fn visit_token(&mut self, token: &mut TokenOrValue<'i>) -> Result<(), Self::Error> {
        if let TokenOrValue::Token(inner) = &*token {
            let data = NodeData::new(variant_name(inner));
            return self.leaf(NodeKind::Token, data);
        }
        token.visit_children(self)
    }
}

fn property_names(properties: &[Property<'_>]) -> Vec<String> {
    properties
        .iter()
        .map(|property| property.property_id().name().to_string())
        .collect()
}

/// Component types in source order, e.g. `class combinator type` for `.a p`
fn selector_components(selector: &Selector<'_>) -> String {
    let types: Vec<&str> = selector.iter_raw_match_order().rev().map(component_type).collect();
    types.join(" ")
}

fn component_type(component: &Component<'_>) -> &'static str {
    match component {
        Component::Combinator { .. } => "combinator",
        Component::ExplicitUniversalType { .. } => "universal",
        Component::ExplicitAnyNamespace { .. }
        | Component::ExplicitNoNamespace { .. }
        | Component::DefaultNamespace { .. }
        | Component::Namespace { .. } => "namespace",
        Component::LocalName { .. } => "type",
        Component::ID { .. } => "id",
        Component::Class { .. } => "class",
        Component::AttributeInNoNamespaceExists { .. }
        | Component::AttributeInNoNamespace { .. }
        | Component::AttributeOther { .. } => "attribute",
        Component::PseudoElement { .. } => "pseudo-element",
        Component::Nesting { .. } => "nesting",
        // :not(), :is(), :nth-child() and the other pseudo-classes
        _ => "pseudo-class",
    }
}

/// Variant name from a value's `Debug` output, e.g. `Deg` for `Deg(90.0)`
fn variant_name<T: std::fmt::Debug>(value: &T) -> String {
    let debug = format!("{:?}", value);
    debug
        .split(['(', ' ', '{'])
        .next()
        .unwrap_or_default()
        .to_string()
}

fn css_text<T: ToCss>(value: &T) -> Option<String> {
    value.to_css_string(PrinterOptions::default()).ok()
}

fn image_type(image: &Image<'_>) -> &'static str {
    match image {
        Image::None => "none",
        Image::Url(_) => "url",
        Image::Gradient(_) => "gradient",
        Image::ImageSet(_) => "image-set",
    }
}

fn rule_type(rule: &CssRule<'_>) -> &'static str {
    match rule {
        CssRule::Media(_) => "media",
        CssRule::Import(_) => "import",
        CssRule::Style(_) => "style",
        CssRule::Keyframes(_) => "keyframes",
        CssRule::FontFace(_) => "font-face",
        CssRule::FontPaletteValues(_) => "font-palette-values",
        CssRule::FontFeatureValues(_) => "font-feature-values",
        CssRule::Page(_) => "page",
        CssRule::Supports(_) => "supports",
        CssRule::CounterStyle(_) => "counter-style",
        CssRule::Namespace(_) => "namespace",
        CssRule::MozDocument(_) => "moz-document",
        CssRule::Nesting(_) => "nesting",
        CssRule::NestedDeclarations(_) => "nested-declarations",
        CssRule::Viewport(_) => "viewport",
        CssRule::CustomMedia(_) => "custom-media",
        CssRule::LayerStatement(_) => "layer-statement",
        CssRule::LayerBlock(_) => "layer-block",
        CssRule::Property(_) => "property",
        CssRule::Container(_) => "container",
        CssRule::Scope(_) => "scope",
        CssRule::StartingStyle(_) => "starting-style",
        CssRule::ViewTransition(_) => "view-transition",
        CssRule::PositionTry(_) => "position-try",
        CssRule::Unknown(_) => "unknown",
        CssRule::Ignored => "ignored",
        CssRule::Custom(_) => "custom",
    }
}

fn rule_location(rule: &CssRule<'_>) -> Option<Location> {
    let loc = match rule {
        CssRule::Media(r) => r.loc,
        CssRule::Import(r) => r.loc,
        CssRule::Style(r) => r.loc,
        CssRule::Keyframes(r) => r.loc,
        CssRule::FontFace(r) => r.loc,
        CssRule::FontPaletteValues(r) => r.loc,
        CssRule::FontFeatureValues(r) => r.loc,
        CssRule::Page(r) => r.loc,
        CssRule::Supports(r) => r.loc,
        CssRule::CounterStyle(r) => r.loc,
        CssRule::Namespace(r) => r.loc,
        CssRule::MozDocument(r) => r.loc,
        CssRule::Nesting(r) => r.loc,
        CssRule::NestedDeclarations(r) => r.loc,
        CssRule::Viewport(r) => r.loc,
        CssRule::CustomMedia(r) => r.loc,
        CssRule::LayerStatement(r) => r.loc,
        CssRule::LayerBlock(r) => r.loc,
        CssRule::Property(r) => r.loc,
        CssRule::Container(r) => r.loc,
        CssRule::Scope(r) => r.loc,
        CssRule::StartingStyle(r) => r.loc,
        CssRule::ViewTransition(r) => r.loc,
        CssRule::PositionTry(r) => r.loc,
        CssRule::Unknown(r) => r.loc,
        CssRule::Ignored | CssRule::Custom(_) => return None,
    };
    Some(loc)
}
